//! Catalog of every schema version the application ships.
//!
//! Versions live in a `<name>.schemas` package directory: a
//! `versions.json` descriptor carrying the version-hash table, plus one
//! schema document per version. Documents sit either directly in the
//! package (flat layout) or inside a per-version subdirectory (nested
//! layout, used once a version accumulates sidecar artifacts); the flat
//! location wins when both exist.
//!
//! # Examples
//!
//! ```rust,ignore
//! use shopstore::schema::inventory::ModelsInventory;
//!
//! let inventory = ModelsInventory::from_package("Shop", app_support_dir)?;
//! let latest = inventory.materialize(inventory.current_version())?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::InventoryError;
use crate::schema::definition::SchemaDefinition;
use crate::schema::version::ModelVersion;

/// Extension of the schema package directory.
pub const PACKAGE_EXTENSION: &str = "schemas";

/// Name of the version descriptor inside the package.
pub const VERSION_DESCRIPTOR_FILE: &str = "versions.json";

/// The full, sorted catalog of schema versions, plus the package they
/// load from.
///
/// Built once per persistence-manager instance and read-only afterwards.
/// Construction guarantees at least one version.
#[derive(Debug, Clone)]
pub struct ModelsInventory {
    package_url: PathBuf,
    versions: Vec<ModelVersion>,
}

impl ModelsInventory {
    /// Load the inventory from `<search_location>/<package_name>.schemas`.
    pub fn from_package(
        package_name: &str,
        search_location: &Path,
    ) -> Result<Self, InventoryError> {
        let package_url =
            search_location.join(format!("{package_name}.{PACKAGE_EXTENSION}"));
        if !package_url.is_dir() {
            return Err(InventoryError::PackageNotFound {
                package: package_name.to_string(),
                search_location: search_location.to_path_buf(),
            });
        }

        let descriptor = package_url.join(VERSION_DESCRIPTOR_FILE);
        let bytes = fs::read(&descriptor).map_err(|_| InventoryError::MissingVersionMetadata {
            descriptor: descriptor.clone(),
        })?;

        let versions = parse_descriptor(&descriptor, &bytes)?;
        Ok(Self {
            package_url,
            versions,
        })
    }

    pub fn package_url(&self) -> &Path {
        &self.package_url
    }

    /// All versions, sorted ascending in migration order.
    pub fn versions(&self) -> &[ModelVersion] {
        &self.versions
    }

    /// The newest version, conventionally the migration target.
    pub fn current_version(&self) -> &ModelVersion {
        // Construction rejects an empty version table.
        self.versions.last().unwrap()
    }

    pub fn version_named(&self, name: &str) -> Option<&ModelVersion> {
        self.versions.iter().find(|v| v.name() == name)
    }

    /// Resolve a version identifier to its loadable schema definition.
    pub fn materialize(&self, version: &ModelVersion) -> Result<SchemaDefinition, InventoryError> {
        let flat = self.package_url.join(version.schema_file_name());
        let nested = self.package_url.join(version.nested_schema_path());

        let path = if flat.is_file() {
            flat
        } else if nested.is_file() {
            nested
        } else {
            return Err(InventoryError::SchemaNotFound {
                version: version.name().to_string(),
            });
        };

        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|source| InventoryError::CorruptSchema { path, source })
    }
}

/// Parse the descriptor's version-hash table and return the sorted
/// version list.
fn parse_descriptor(
    descriptor: &Path,
    bytes: &[u8],
) -> Result<Vec<ModelVersion>, InventoryError> {
    let corrupt = |detail: &str| InventoryError::CorruptVersionMetadata {
        descriptor: descriptor.to_path_buf(),
        detail: detail.to_string(),
    };

    let raw: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|_| corrupt("not a JSON document"))?;
    let table = raw
        .get("version_hashes")
        .and_then(|v| v.as_object())
        .ok_or_else(|| corrupt("no version_hashes table"))?;

    if table.is_empty() {
        return Err(corrupt("version_hashes table is empty"));
    }
    if table.values().any(|v| !v.is_string()) {
        return Err(corrupt("version_hashes values must be hash strings"));
    }

    let mut versions: Vec<ModelVersion> =
        table.keys().map(|name| ModelVersion::new(name.as_str())).collect();
    versions.sort();
    Ok(versions)
}
