//! Iterative, staged store migration.
//!
//! [`migrator::IterativeMigrator`] is the entry point; [`plan`] computes
//! the hop sequence and [`staging`] executes one hop without ever leaving
//! the live store half-written.

pub mod migrator;
pub mod plan;
pub mod staging;

pub use migrator::{IterativeMigrator, MigrationOutcome};
pub use plan::{MigrationPlan, MigrationStep};
pub use staging::{HopPhase, StagedHop, StagingError, StagingFailure};
