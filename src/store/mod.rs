//! The concrete store: file format, metadata block, and the coordinator
//! contract the migrator drives it through.

pub mod coordinator;
pub mod file;
pub mod metadata;

pub use coordinator::{FileStoreCoordinator, StoreCoordinator};
pub use file::{Record, StoreFile, StoreKind};
pub use metadata::StoreMetadata;
