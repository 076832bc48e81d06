//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need to load an inventory, build a
//! migrator, and run a migration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shopstore::prelude::*;
//! ```

pub use crate::config::MigrationConfig;
pub use crate::errors::{StoreError, StoreResult};
pub use crate::migration::{IterativeMigrator, MigrationOutcome, MigrationPlan, MigrationStep};
pub use crate::schema::{
    EntityDefinition, FieldDefinition, FieldKind, FieldValue, MappingResolver, ModelVersion,
    ModelsInventory, SchemaDefinition, SchemaMapping,
};
pub use crate::store::{
    FileStoreCoordinator, Record, StoreCoordinator, StoreFile, StoreKind, StoreMetadata,
};
pub use crate::utils::fs::{FileOps, StdFileOps};
