//! The concrete on-disk store file.
//!
//! A store is a set of entity tables holding generic records, plus the
//! metadata block the migrator reads. Two encodings exist: the binary
//! format (magic-prefixed bincode payload) used by the app, and a JSON
//! format kept for debugging and support tooling.
//!
//! Inserts are validated against a schema definition so a buggy mapping
//! cannot silently write records the next version can't read.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::StoreFileError;
use crate::schema::definition::SchemaDefinition;
use crate::schema::value::FieldValue;
use crate::store::metadata::StoreMetadata;

/// Magic bytes prefixing the binary store encoding.
pub const STORE_MAGIC: [u8; 4] = *b"SHST";

/// On-disk encoding of a store file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    Binary,
    Json,
}

/// One row of an entity table.
pub type Record = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreFile {
    pub metadata: StoreMetadata,
    tables: BTreeMap<String, Vec<Record>>,
}

impl StoreFile {
    /// An empty store saved with `schema`: one empty table per entity,
    /// metadata recording the schema's hash and name.
    pub fn for_schema(schema: &SchemaDefinition) -> Self {
        let tables = schema
            .entities
            .iter()
            .map(|entity| (entity.name.clone(), Vec::new()))
            .collect();
        Self {
            metadata: StoreMetadata::for_schema(schema),
            tables,
        }
    }

    /// Insert a record after validating it against `schema`.
    pub fn insert(
        &mut self,
        schema: &SchemaDefinition,
        entity_name: &str,
        record: Record,
    ) -> Result<(), StoreFileError> {
        let entity = schema
            .entity(entity_name)
            .ok_or_else(|| StoreFileError::UnknownEntity {
                entity: entity_name.to_string(),
            })?;

        for (field_name, value) in &record {
            let field =
                entity
                    .field(field_name)
                    .ok_or_else(|| StoreFileError::UnknownField {
                        entity: entity_name.to_string(),
                        field: field_name.clone(),
                    })?;

            if value.is_null() {
                if !field.optional {
                    return Err(StoreFileError::MissingField {
                        entity: entity_name.to_string(),
                        field: field_name.clone(),
                    });
                }
            } else if value.kind() != Some(field.kind) {
                return Err(StoreFileError::KindMismatch {
                    entity: entity_name.to_string(),
                    field: field_name.clone(),
                    expected: field.kind.to_string(),
                    found: value.kind_name().to_string(),
                });
            }
        }

        for field in &entity.fields {
            if !field.optional && !record.contains_key(&field.name) {
                return Err(StoreFileError::MissingField {
                    entity: entity_name.to_string(),
                    field: field.name.clone(),
                });
            }
        }

        self.tables
            .entry(entity_name.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    pub fn count(&self, entity_name: &str) -> usize {
        self.tables.get(entity_name).map_or(0, Vec::len)
    }

    pub fn records(&self, entity_name: &str) -> &[Record] {
        self.tables.get(entity_name).map_or(&[], Vec::as_slice)
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn save(&self, path: &Path, kind: StoreKind) -> Result<(), StoreFileError> {
        let bytes = match kind {
            StoreKind::Binary => {
                let mut bytes = STORE_MAGIC.to_vec();
                bytes.extend(bincode::serde::encode_to_vec(
                    self,
                    bincode::config::standard(),
                )?);
                bytes
            }
            StoreKind::Json => serde_json::to_vec_pretty(self)?,
        };
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: &Path, kind: StoreKind) -> Result<Self, StoreFileError> {
        let bytes = fs::read(path)?;
        match kind {
            StoreKind::Binary => {
                let payload = bytes.strip_prefix(&STORE_MAGIC[..]).ok_or_else(|| {
                    StoreFileError::UnrecognizedFormat {
                        path: path.to_path_buf(),
                    }
                })?;
                let (store, _) =
                    bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
                Ok(store)
            }
            StoreKind::Json => Ok(serde_json::from_slice(&bytes)?),
        }
    }
}
