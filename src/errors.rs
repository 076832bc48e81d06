//! Error taxonomy for the storage layer.
//!
//! Setup errors (inventory construction, unreadable metadata) are returned
//! as `Err` from the migrator before any store file is touched. Planning
//! and per-hop errors surface through [`MigrationOutcome`] instead, because
//! the caller's recovery policy is "destroy and recreate", not "crash".
//!
//! [`MigrationOutcome`]: crate::migration::MigrationOutcome

use std::path::PathBuf;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Inventory Error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Store File Error: {0}")]
    StoreFile(#[from] StoreFileError),

    #[error("Mapping Error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Transform Error: {0}")]
    Transform(#[from] TransformError),

    #[error("Staging Error: {0}")]
    Staging(#[from] crate::migration::staging::StagingError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while locating or reading the versioned schema package.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("no schema package named {package:?} at {search_location}")]
    PackageNotFound {
        package: String,
        search_location: PathBuf,
    },

    #[error("version descriptor {descriptor} is missing or unreadable")]
    MissingVersionMetadata { descriptor: PathBuf },

    #[error("version descriptor {descriptor} is corrupt: {detail}")]
    CorruptVersionMetadata { descriptor: PathBuf, detail: String },

    #[error("no schema file for version {version:?} in the package")]
    SchemaNotFound { version: String },

    #[error("schema file {path} is corrupt: {source}")]
    CorruptSchema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reading, writing, or validating a concrete store file.
#[derive(Error, Debug)]
pub enum StoreFileError {
    #[error("unrecognized store format at {path}")]
    UnrecognizedFormat { path: PathBuf },

    #[error("there was an error encoding the store")]
    Encoding(#[from] bincode::error::EncodeError),

    #[error("there was an error decoding the store")]
    Decoding(#[from] bincode::error::DecodeError),

    #[error("there was an error with the JSON store encoding")]
    Json(#[from] serde_json::Error),

    #[error("store has no entity named {entity:?}")]
    UnknownEntity { entity: String },

    #[error("entity {entity:?} has no field named {field:?}")]
    UnknownField { entity: String, field: String },

    #[error("field {entity}.{field} expects {expected}, got {found}")]
    KindMismatch {
        entity: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("required field {entity}.{field} is missing")]
    MissingField { entity: String, field: String },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a mapping between two schema versions could not be resolved.
///
/// A custom mapping always takes precedence; these errors describe why
/// structural inference gave up when no custom mapping was registered.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("no mapping available from {source_version:?} to {target_version:?}: {reason}")]
    NoMappingAvailable {
        source_version: String,
        target_version: String,
        reason: String,
    },

    #[error("field {entity}.{field} changed kind from {from} to {to}, schemas are too divergent to auto-map")]
    KindChanged {
        entity: String,
        field: String,
        from: String,
        to: String,
    },

    #[error("required field {entity}.{field} was added without a default, schemas are too divergent to auto-map")]
    RequiredFieldAdded { entity: String, field: String },
}

/// Failures while transforming one store into the next schema version.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("failed to read source store {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: StoreFileError,
    },

    #[error("failed to apply mapping: {0}")]
    Apply(#[from] StoreFileError),

    #[error("failed to write migrated store {path}: {source}")]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: StoreFileError,
    },
}
