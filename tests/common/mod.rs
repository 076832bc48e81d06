// Common test utilities and helpers
#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use shopstore::errors::{StoreFileError, StoreResult, TransformError};
use shopstore::prelude::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write a `<package_name>.schemas` package holding `schemas` into `dir`,
/// using the flat layout. Returns the package path.
pub fn write_package(dir: &Path, package_name: &str, schemas: &[SchemaDefinition]) -> PathBuf {
    let package = dir.join(format!("{package_name}.schemas"));
    fs::create_dir_all(&package).unwrap();

    let mut hashes = serde_json::Map::new();
    for schema in schemas {
        hashes.insert(
            schema.name.clone(),
            serde_json::Value::String(schema.schema_hash()),
        );
        fs::write(
            package.join(format!("{}.schema.json", schema.name)),
            serde_json::to_vec_pretty(schema).unwrap(),
        )
        .unwrap();
    }

    let descriptor = serde_json::json!({ "version_hashes": hashes });
    fs::write(
        package.join("versions.json"),
        serde_json::to_vec_pretty(&descriptor).unwrap(),
    )
    .unwrap();
    package
}

/// The historical schema chain used across the migration tests.
///
/// - Model 1: Product (id, title, cross-sell IDs), ProductCategory
/// - Model 2: adds Product.sku
/// - Model 3: drops ProductCategory, adds Order
pub fn schema_chain() -> Vec<SchemaDefinition> {
    let product_v1 = EntityDefinition::new(
        "Product",
        vec![
            FieldDefinition::required("product_id", FieldKind::Int),
            FieldDefinition::required("title", FieldKind::Text),
            FieldDefinition::optional("cross_sell_ids", FieldKind::IntList),
        ],
    );
    let product_category = EntityDefinition::new(
        "ProductCategory",
        vec![
            FieldDefinition::required("category_id", FieldKind::Int),
            FieldDefinition::required("name", FieldKind::Text),
        ],
    );

    let mut product_v2 = product_v1.clone();
    product_v2
        .fields
        .push(FieldDefinition::optional("sku", FieldKind::Text));

    let order = EntityDefinition::new(
        "Order",
        vec![
            FieldDefinition::required("order_id", FieldKind::Int),
            FieldDefinition::required("total", FieldKind::Float),
        ],
    );

    vec![
        SchemaDefinition::new("Model 1", vec![product_v1, product_category.clone()]),
        SchemaDefinition::new("Model 2", vec![product_v2.clone(), product_category]),
        SchemaDefinition::new("Model 3", vec![product_v2, order]),
    ]
}

/// A longer chain where version N's Product grows one extra field per
/// revision, so every version hashes distinctly.
pub fn growing_chain(len: usize) -> Vec<SchemaDefinition> {
    (0..len)
        .map(|index| {
            let fields = (0..=index)
                .map(|f| FieldDefinition::optional(format!("field_{f}"), FieldKind::Int))
                .collect();
            SchemaDefinition::new(
                format!("Model {}", index + 1),
                vec![EntityDefinition::new("Product", fields)],
            )
        })
        .collect()
}

pub fn product_record(id: i64, title: &str) -> Record {
    Record::from([
        ("product_id".to_string(), FieldValue::Int(id)),
        ("title".to_string(), FieldValue::from(title)),
    ])
}

pub fn category_record(id: i64, name: &str) -> Record {
    Record::from([
        ("category_id".to_string(), FieldValue::Int(id)),
        ("name".to_string(), FieldValue::from(name)),
    ])
}

/// Save a store seeded with `records` for `schema` at `path`.
pub fn seed_store(
    path: &Path,
    kind: StoreKind,
    schema: &SchemaDefinition,
    records: &[(&str, Record)],
) {
    let mut store = StoreFile::for_schema(schema);
    for (entity, record) in records {
        store.insert(schema, entity, record.clone()).unwrap();
    }
    store.save(path, kind).unwrap();
}

/// Messages recording a hop attempt in a migration outcome.
pub fn attempt_messages(outcome: &MigrationOutcome) -> Vec<&str> {
    outcome
        .debug_messages
        .iter()
        .filter(|m| m.starts_with("Attempting migration"))
        .map(String::as_str)
        .collect()
}

/// Coordinator that counts transformation calls and can be told to fail
/// the Nth one; everything else is delegated to the real coordinator.
pub struct CountingCoordinator {
    inner: FileStoreCoordinator,
    pub calls: Cell<usize>,
    fail_at: Option<usize>,
}

impl CountingCoordinator {
    pub fn new(fail_at: Option<usize>) -> Self {
        Self {
            inner: FileStoreCoordinator::new(),
            calls: Cell::new(0),
            fail_at,
        }
    }
}

impl StoreCoordinator for CountingCoordinator {
    fn metadata_for_store(&self, path: &Path, kind: StoreKind) -> StoreResult<StoreMetadata> {
        self.inner.metadata_for_store(path, kind)
    }

    fn is_compatible(&self, schema: &SchemaDefinition, metadata: &StoreMetadata) -> bool {
        self.inner.is_compatible(schema, metadata)
    }

    fn migrate_store(
        &self,
        source: &Path,
        destination: &Path,
        kind: StoreKind,
        source_schema: &SchemaDefinition,
        target_schema: &SchemaDefinition,
        mapping: &SchemaMapping,
    ) -> Result<(), TransformError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if self.fail_at == Some(call) {
            return Err(TransformError::Apply(StoreFileError::UnknownEntity {
                entity: "induced".to_string(),
            }));
        }
        self.inner
            .migrate_store(source, destination, kind, source_schema, target_schema, mapping)
    }

    fn destroy_store(&self, path: &Path, kind: StoreKind) -> StoreResult<()> {
        self.inner.destroy_store(path, kind)
    }
}
