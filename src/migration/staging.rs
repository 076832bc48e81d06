//! Staged execution of a single migration hop.
//!
//! One hop never writes into the live store. The transformation lands in
//! a sibling staging directory first; only after it fully succeeds does
//! the original (with its auxiliary siblings) move into a backup
//! directory and the migrated files take its place. The backup is
//! insurance against a failed swap and is deleted once the swap is done.
//!
//! Phases are explicit and every failure is typed with the phase it
//! happened in, so a failed migration can be diagnosed from its log line
//! alone and tests can induce failure at any single phase through
//! [`FileOps`].
//!
//! There is deliberately no automatic rollback if the promote phase
//! fails partway: the caller's recovery policy for a failed migration is
//! to destroy and recreate the store, and a half-promoted directory is
//! exactly the state that policy exists for.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::MigrationConfig;
use crate::errors::TransformError;
use crate::migration::plan::MigrationStep;
use crate::schema::mapping::SchemaMapping;
use crate::store::coordinator::StoreCoordinator;
use crate::store::file::StoreKind;
use crate::utils::fs::{FileOps, clear_dir_best_effort, related_store_files};

/// The phases of one staged hop, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum HopPhase {
    PrepareStaging,
    Transform,
    BackupOriginal,
    PromoteMigrated,
    CleanupBackup,
}

/// A hop failure, tagged with the phase and path where it happened.
#[derive(Error, Debug)]
#[error("migration hop failed during {phase} at {}: {source}", path.display())]
pub struct StagingError {
    pub phase: HopPhase,
    pub path: PathBuf,
    #[source]
    pub source: StagingFailure,
}

#[derive(Error, Debug)]
pub enum StagingFailure {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Executes hops against one store location.
pub struct StagedHop<'a> {
    file_ops: &'a dyn FileOps,
    config: &'a MigrationConfig,
}

impl<'a> StagedHop<'a> {
    pub fn new(file_ops: &'a dyn FileOps, config: &'a MigrationConfig) -> Self {
        Self { file_ops, config }
    }

    /// Run one hop against the store at `store_path`.
    ///
    /// On success the store at `store_path` is the migrated one. On
    /// failure in the transform phase or earlier, the original store is
    /// untouched.
    pub fn run(
        &self,
        coordinator: &dyn StoreCoordinator,
        store_path: &Path,
        kind: StoreKind,
        step: &MigrationStep,
        mapping: &SchemaMapping,
    ) -> Result<(), StagingError> {
        let store_dir = store_path.parent().unwrap_or(Path::new("."));
        let staging_dir = store_dir.join(&self.config.staging_dir_name);
        let backup_dir = store_dir.join(&self.config.backup_dir_name);

        self.prepare(&staging_dir, &backup_dir)?;
        let staged_store = self.transform(coordinator, store_path, &staging_dir, kind, step, mapping)?;
        self.backup_original(store_path, &backup_dir)?;
        self.promote_migrated(&staging_dir, store_dir)?;
        self.cleanup_backup(&backup_dir)?;

        log::info!(
            "hop {} -> {} complete, staged store {} promoted into place",
            step.source_version,
            step.target_version,
            staged_store.display()
        );
        Ok(())
    }

    /// Clear stale leftovers from an interrupted earlier run and make
    /// sure both working directories exist. Stale-content removal is
    /// best-effort; directory creation is not.
    fn prepare(&self, staging_dir: &Path, backup_dir: &Path) -> Result<(), StagingError> {
        clear_dir_best_effort(self.file_ops, staging_dir);
        clear_dir_best_effort(self.file_ops, backup_dir);

        for dir in [staging_dir, backup_dir] {
            self.file_ops
                .create_dir_all(dir)
                .map_err(|e| phase_error(HopPhase::PrepareStaging, dir, e))?;
        }
        Ok(())
    }

    /// Run the actual transformation into the staging directory. The
    /// original store has not been touched if this fails.
    fn transform(
        &self,
        coordinator: &dyn StoreCoordinator,
        store_path: &Path,
        staging_dir: &Path,
        kind: StoreKind,
        step: &MigrationStep,
        mapping: &SchemaMapping,
    ) -> Result<PathBuf, StagingError> {
        let file_name = store_path.file_name().unwrap_or_default();
        let staged_store = staging_dir.join(file_name);

        coordinator
            .migrate_store(store_path, &staged_store, kind, &step.source_schema, &step.target_schema, mapping)
            .map_err(|e| StagingError {
                phase: HopPhase::Transform,
                path: staged_store.clone(),
                source: e.into(),
            })?;
        Ok(staged_store)
    }

    /// Move the original store and all of its siblings into the backup
    /// directory. A failure here stops the hop: continuing would leave
    /// it ambiguous which files moved.
    fn backup_original(&self, store_path: &Path, backup_dir: &Path) -> Result<(), StagingError> {
        let originals = related_store_files(self.file_ops, store_path)
            .map_err(|e| phase_error(HopPhase::BackupOriginal, store_path, e))?;

        for file in &originals {
            let destination = backup_dir.join(file.file_name().unwrap_or_default());
            self.file_ops
                .move_file(file, &destination)
                .map_err(|e| phase_error(HopPhase::BackupOriginal, file, e))?;
        }
        Ok(())
    }

    /// Move every staged file into the store's directory, clearing any
    /// same-named leftover first.
    fn promote_migrated(&self, staging_dir: &Path, store_dir: &Path) -> Result<(), StagingError> {
        let staged = self
            .file_ops
            .list_dir(staging_dir)
            .map_err(|e| phase_error(HopPhase::PromoteMigrated, staging_dir, e))?;

        for file in &staged {
            let destination = store_dir.join(file.file_name().unwrap_or_default());
            if self.file_ops.file_exists(&destination) {
                self.file_ops
                    .remove_file(&destination)
                    .map_err(|e| phase_error(HopPhase::PromoteMigrated, &destination, e))?;
            }
            self.file_ops
                .move_file(file, &destination)
                .map_err(|e| phase_error(HopPhase::PromoteMigrated, file, e))?;
        }
        Ok(())
    }

    /// The backup only existed in case the promote phase failed; once
    /// the swap succeeded it is redundant.
    fn cleanup_backup(&self, backup_dir: &Path) -> Result<(), StagingError> {
        let leftovers = self
            .file_ops
            .list_dir(backup_dir)
            .map_err(|e| phase_error(HopPhase::CleanupBackup, backup_dir, e))?;

        for file in &leftovers {
            self.file_ops
                .remove_file(file)
                .map_err(|e| phase_error(HopPhase::CleanupBackup, file, e))?;
        }
        Ok(())
    }
}

fn phase_error(phase: HopPhase, path: &Path, source: std::io::Error) -> StagingError {
    log::error!("{phase} failed at {}: {source}", path.display());
    StagingError {
        phase,
        path: path.to_path_buf(),
        source: source.into(),
    }
}
