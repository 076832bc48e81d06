//! Opaque store metadata.
//!
//! Metadata is the only thing the migrator reads from an existing store:
//! an ordered key/value map describing which schema the store was last
//! saved with. The migrator never mutates a store's metadata itself;
//! only the transformation that writes a migrated store stamps new
//! values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::definition::SchemaDefinition;

/// Content hash of the schema the store was last saved with.
pub const META_SCHEMA_HASH: &str = "schema-hash";

/// Catalog name of that schema, informational only.
pub const META_SCHEMA_NAME: &str = "schema-name";

/// RFC 3339 timestamp of the last migration that produced this store.
pub const META_MIGRATED_AT: &str = "migrated-at";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreMetadata {
    values: BTreeMap<String, String>,
}

impl StoreMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata describing a store saved with `schema`.
    pub fn for_schema(schema: &SchemaDefinition) -> Self {
        let mut metadata = Self::new();
        metadata.set(META_SCHEMA_HASH, schema.schema_hash());
        metadata.set(META_SCHEMA_NAME, schema.name.clone());
        metadata
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    pub fn schema_hash(&self) -> Option<&str> {
        self.get(META_SCHEMA_HASH)
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.get(META_SCHEMA_NAME)
    }

    pub fn migrated_at(&self) -> Option<DateTime<Utc>> {
        self.get(META_MIGRATED_AT)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Record the moment a migration produced this store.
    pub fn stamp_migrated_at(&mut self, at: DateTime<Utc>) {
        self.set(META_MIGRATED_AT, at.to_rfc3339());
    }
}
