//! # Shopstore
//!
//! Local persistence layer for a mobile commerce client: a versioned
//! schema catalog and an iterative, staged store migrator.
//!
//! ## Features
//!
//! - **Versioned Schemas**: On-disk catalog of every schema revision the
//!   app has ever shipped, ordered for migration
//! - **Iterative Migration**: Walks one adjacent version at a time, so a
//!   user can skip any number of app versions without risk
//! - **Staged Swaps**: Each hop is transformed into a staging directory
//!   and swapped in behind a backup; the live store is never left
//!   half-written
//! - **Custom Mappings**: Hand-written hop mappings take precedence over
//!   structural inference
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopstore::prelude::*;
//!
//! // Load the shipped schema catalog.
//! let inventory = ModelsInventory::from_package("Shop", &support_dir)?;
//! let target = inventory.materialize(inventory.current_version())?;
//!
//! // Migrate the store up to the current schema, hop by hop.
//! let migrator = IterativeMigrator::new(Box::new(FileStoreCoordinator::new()), inventory);
//! let outcome = migrator.iterative_migrate(&store_path, StoreKind::Binary, &target)?;
//!
//! if !outcome.success {
//!     // Policy decision for incompatible stores: start over.
//!     FileStoreCoordinator::new().destroy_store(&store_path, StoreKind::Binary)?;
//! }
//! ```

pub mod config;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod schema;
pub mod store;
pub mod utils;
