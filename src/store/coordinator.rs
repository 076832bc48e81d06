//! Store coordination: the contract between the migrator and the
//! underlying store engine.
//!
//! The migrator never opens a store itself. It asks a [`StoreCoordinator`]
//! to read metadata, check compatibility, run one hop's transformation,
//! and destroy stores the caller decides to give up on. Keeping this
//! behind a trait lets tests count or fail individual hops without any
//! real store on disk.

use std::path::Path;

use chrono::Utc;

use crate::errors::{StoreResult, TransformError};
use crate::schema::definition::SchemaDefinition;
use crate::schema::mapping::{FieldSource, SchemaMapping};
use crate::schema::value::FieldValue;
use crate::store::file::{Record, StoreFile, StoreKind};
use crate::store::metadata::StoreMetadata;
use crate::utils::fs::{StdFileOps, related_store_files};

pub trait StoreCoordinator {
    /// Read the metadata block of an existing store.
    fn metadata_for_store(&self, path: &Path, kind: StoreKind) -> StoreResult<StoreMetadata>;

    /// Whether a store with `metadata` is already compatible with
    /// `schema`, i.e. no migration is necessary.
    fn is_compatible(&self, schema: &SchemaDefinition, metadata: &StoreMetadata) -> bool;

    /// Transform the store at `source` into `target_schema`, writing the
    /// fully migrated result to `destination`. Must leave `source`
    /// untouched.
    fn migrate_store(
        &self,
        source: &Path,
        destination: &Path,
        kind: StoreKind,
        source_schema: &SchemaDefinition,
        target_schema: &SchemaDefinition,
        mapping: &SchemaMapping,
    ) -> Result<(), TransformError>;

    /// Remove a store and its auxiliary siblings.
    fn destroy_store(&self, path: &Path, kind: StoreKind) -> StoreResult<()>;
}

/// Default coordinator over the [`StoreFile`] format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStoreCoordinator;

impl FileStoreCoordinator {
    pub fn new() -> Self {
        Self
    }
}

impl StoreCoordinator for FileStoreCoordinator {
    fn metadata_for_store(&self, path: &Path, kind: StoreKind) -> StoreResult<StoreMetadata> {
        let store = StoreFile::load(path, kind)?;
        Ok(store.metadata)
    }

    fn is_compatible(&self, schema: &SchemaDefinition, metadata: &StoreMetadata) -> bool {
        metadata.schema_hash() == Some(schema.schema_hash().as_str())
    }

    fn migrate_store(
        &self,
        source: &Path,
        destination: &Path,
        kind: StoreKind,
        _source_schema: &SchemaDefinition,
        target_schema: &SchemaDefinition,
        mapping: &SchemaMapping,
    ) -> Result<(), TransformError> {
        let store = StoreFile::load(source, kind).map_err(|source_err| {
            TransformError::SourceRead {
                path: source.to_path_buf(),
                source: source_err,
            }
        })?;

        let mut migrated = StoreFile::for_schema(target_schema);
        for entity_mapping in &mapping.entity_mappings {
            // A mapping without a source entity introduces a new, empty
            // table; `for_schema` already created it.
            let Some(source_entity) = &entity_mapping.source_entity else {
                continue;
            };

            for record in store.records(source_entity) {
                let mut migrated_record = Record::new();
                for field_mapping in &entity_mapping.field_mappings {
                    let value = match &field_mapping.source {
                        FieldSource::CopyOf(field) => {
                            record.get(field).cloned().unwrap_or(FieldValue::Null)
                        }
                        FieldSource::Value(value) => value.clone(),
                    };
                    if !value.is_null() {
                        migrated_record.insert(field_mapping.target_field.clone(), value);
                    }
                }
                migrated
                    .insert(target_schema, &entity_mapping.target_entity, migrated_record)
                    .map_err(TransformError::Apply)?;
            }
        }

        migrated.metadata.stamp_migrated_at(Utc::now());
        migrated
            .save(destination, kind)
            .map_err(|source_err| TransformError::DestinationWrite {
                path: destination.to_path_buf(),
                source: source_err,
            })?;

        log::info!(
            "wrote migrated store for schema {:?} to {}",
            target_schema.name,
            destination.display()
        );
        Ok(())
    }

    fn destroy_store(&self, path: &Path, _kind: StoreKind) -> StoreResult<()> {
        let ops = StdFileOps;
        for file in related_store_files(&ops, path)? {
            std::fs::remove_file(&file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::definition::{EntityDefinition, FieldDefinition};
    use crate::schema::mapping::{EntityMapping, FieldMapping};
    use crate::schema::value::FieldKind;

    fn source_schema() -> SchemaDefinition {
        SchemaDefinition::new(
            "Model 1",
            vec![EntityDefinition::new(
                "Product",
                vec![
                    FieldDefinition::required("product_id", FieldKind::Int),
                    FieldDefinition::required("title", FieldKind::Text),
                ],
            )],
        )
    }

    fn target_schema() -> SchemaDefinition {
        SchemaDefinition::new(
            "Model 2",
            vec![EntityDefinition::new(
                "Product",
                vec![
                    FieldDefinition::required("product_id", FieldKind::Int),
                    FieldDefinition::required("name", FieldKind::Text),
                ],
            )],
        )
    }

    #[test]
    fn test_migrate_store_applies_mapping_and_stamps_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("shop.db");
        let dest_path = dir.path().join("migrated.db");

        let source = source_schema();
        let target = target_schema();

        let mut store = StoreFile::for_schema(&source);
        store
            .insert(
                &source,
                "Product",
                Record::from([
                    ("product_id".to_string(), FieldValue::Int(42)),
                    ("title".to_string(), FieldValue::from("Belt")),
                ]),
            )
            .unwrap();
        store.save(&source_path, StoreKind::Binary).unwrap();

        let mapping = SchemaMapping::new(vec![EntityMapping::from_entity(
            "Product",
            "Product",
            vec![
                FieldMapping::copy("product_id"),
                FieldMapping::copied("name", "title"),
            ],
        )]);

        let coordinator = FileStoreCoordinator::new();
        coordinator
            .migrate_store(
                &source_path,
                &dest_path,
                StoreKind::Binary,
                &source,
                &target,
                &mapping,
            )
            .unwrap();

        let migrated = StoreFile::load(&dest_path, StoreKind::Binary).unwrap();
        assert_eq!(migrated.count("Product"), 1);
        assert_eq!(
            migrated.records("Product")[0].get("name"),
            Some(&FieldValue::from("Belt"))
        );
        assert!(coordinator.is_compatible(&target, &migrated.metadata));
        assert!(migrated.metadata.migrated_at().is_some());

        // Source store is untouched.
        let original = StoreFile::load(&source_path, StoreKind::Binary).unwrap();
        assert_eq!(original.count("Product"), 1);
        assert_eq!(
            original.records("Product")[0].get("title"),
            Some(&FieldValue::from("Belt"))
        );
    }

    #[test]
    fn test_destroy_store_removes_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("shop.db");
        for name in ["shop.db", "shop.db-wal", "shop.db-shm", "keep.db"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        FileStoreCoordinator::new()
            .destroy_store(&store_path, StoreKind::Binary)
            .unwrap();

        assert!(!store_path.exists());
        assert!(!dir.path().join("shop.db-wal").exists());
        assert!(dir.path().join("keep.db").exists());
    }
}
