//! The iterative migrator.
//!
//! Brings an on-disk store into compatibility with a target schema by
//! walking through every intermediate schema version one hop at a time.
//! Runs synchronously, once, during store startup, before anything else
//! has the store open — it provides no locking of its own.
//!
//! Outcomes are split by recoverability: setup problems (unreadable
//! metadata) surface as `Err` before any file is touched, while planning
//! and per-hop failures come back as an unsuccessful
//! [`MigrationOutcome`], because the caller's policy for those is to
//! destroy the store and start fresh rather than crash.

use std::path::Path;

use crate::config::MigrationConfig;
use crate::errors::{InventoryError, StoreResult};
use crate::migration::plan::MigrationPlan;
use crate::migration::staging::StagedHop;
use crate::schema::definition::SchemaDefinition;
use crate::schema::inventory::ModelsInventory;
use crate::schema::mapping::MappingResolver;
use crate::store::coordinator::StoreCoordinator;
use crate::store::file::StoreKind;
use crate::store::metadata::StoreMetadata;
use crate::utils::fs::{FileOps, StdFileOps};

/// Result of one migration request.
///
/// `debug_messages` is an ordered human-readable trace of what was
/// attempted, intended for telemetry and crash-report attachment. It is
/// not a machine interface; callers must not parse it for decisions.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub success: bool,
    pub debug_messages: Vec<String>,
}

impl MigrationOutcome {
    pub fn success(debug_messages: Vec<String>) -> Self {
        Self {
            success: true,
            debug_messages,
        }
    }

    pub fn failure(debug_messages: Vec<String>) -> Self {
        Self {
            success: false,
            debug_messages,
        }
    }
}

pub struct IterativeMigrator {
    coordinator: Box<dyn StoreCoordinator>,
    inventory: ModelsInventory,
    resolver: MappingResolver,
    file_ops: Box<dyn FileOps>,
    config: MigrationConfig,
}

impl IterativeMigrator {
    pub fn new(coordinator: Box<dyn StoreCoordinator>, inventory: ModelsInventory) -> Self {
        Self {
            coordinator,
            inventory,
            resolver: MappingResolver::new(),
            file_ops: Box::new(StdFileOps),
            config: MigrationConfig::default(),
        }
    }

    /// Use a resolver carrying custom hop mappings.
    pub fn with_resolver(mut self, resolver: MappingResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the file-system operations used for the staged swap.
    pub fn with_file_ops(mut self, file_ops: Box<dyn FileOps>) -> Self {
        self.file_ops = file_ops;
        self
    }

    pub fn with_config(mut self, config: MigrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Migrate the store at `source_store` to `target_schema`, walking
    /// every intermediate version, if required.
    ///
    /// Returns the outcome plus its diagnostic trace. A missing store
    /// and an already-compatible store are both successes with zero hops
    /// executed. `Err` is only returned for setup failures that occur
    /// before any file mutation begins.
    pub fn iterative_migrate(
        &self,
        source_store: &Path,
        kind: StoreKind,
        target_schema: &SchemaDefinition,
    ) -> StoreResult<MigrationOutcome> {
        // A store that does not exist yet has nothing to migrate.
        if !self.file_ops.file_exists(source_store) {
            return Ok(MigrationOutcome::success(vec![format!(
                "No store exists at {}. Skipping migration.",
                source_store.display()
            )]));
        }

        let metadata = self.coordinator.metadata_for_store(source_store, kind)?;

        if self.coordinator.is_compatible(target_schema, &metadata) {
            return Ok(MigrationOutcome::success(vec![
                "Target schema is compatible with the store. No migration necessary.".to_string(),
            ]));
        }

        let mut debug_messages = Vec::new();

        let source_schema = match self.schema_for_metadata(&metadata) {
            Ok(Some(schema)) => schema,
            Ok(None) => {
                debug_messages.push(format!(
                    "Failed to find a source schema for store metadata: {metadata:?}"
                ));
                return Ok(MigrationOutcome::failure(debug_messages));
            }
            Err(error) => {
                debug_messages.push(format!("Failed to resolve the source schema: {error}"));
                return Ok(MigrationOutcome::failure(debug_messages));
            }
        };

        let plan = match MigrationPlan::between(&self.inventory, &source_schema, target_schema) {
            Ok(plan) => plan,
            Err(error) => {
                debug_messages.push(format!("Migration planning failed: {error}"));
                return Ok(MigrationOutcome::failure(debug_messages));
            }
        };
        if plan.is_empty() {
            // Nothing to walk; also guards the staged swap from ever
            // running against a store we could not place in the catalog.
            debug_messages.push("Skipping migration. Found no steps for migration.".to_string());
            return Ok(MigrationOutcome::failure(debug_messages));
        }

        let hop = StagedHop::new(self.file_ops.as_ref(), &self.config);

        for step in plan.steps() {
            let attempt = format!(
                "Attempting migration from {} to {}",
                step.source_version, step.target_version
            );
            log::warn!("{attempt}");
            debug_messages.push(attempt);

            let mapping = match self.resolver.resolve(&step.source_schema, &step.target_schema) {
                Ok(mapping) => mapping,
                Err(error) => {
                    log::error!("{error}");
                    debug_messages.push(format!("Migration error: {error}"));
                    return Ok(MigrationOutcome::failure(debug_messages));
                }
            };

            if let Err(error) =
                hop.run(self.coordinator.as_ref(), source_store, kind, step, &mapping)
            {
                log::error!("{error}");
                debug_messages.push(format!("Migration error: {error}"));
                return Ok(MigrationOutcome::failure(debug_messages));
            }
        }

        Ok(MigrationOutcome::success(debug_messages))
    }

    /// Find the inventory version whose materialized schema matches the
    /// store's metadata. Matching is by content hash; the metadata's
    /// name hint is ignored on purpose.
    fn schema_for_metadata(
        &self,
        metadata: &StoreMetadata,
    ) -> Result<Option<SchemaDefinition>, InventoryError> {
        let Some(hash) = metadata.schema_hash() else {
            return Ok(None);
        };

        for version in self.inventory.versions() {
            let schema = self.inventory.materialize(version)?;
            if schema.schema_hash() == hash {
                return Ok(Some(schema));
            }
        }
        Ok(None)
    }
}
