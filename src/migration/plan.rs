//! Migration planning: which hops bridge a store's current schema to the
//! requested target.
//!
//! A plan is computed fresh for every migration request and discarded
//! afterwards. Steps are always adjacent versions from the inventory —
//! skipping an intermediate version would silently drop whatever data
//! transformation only that version's mapping performs.

use crate::errors::InventoryError;
use crate::schema::definition::SchemaDefinition;
use crate::schema::inventory::ModelsInventory;
use crate::schema::version::ModelVersion;

/// One pairwise migration hop between adjacent versions.
#[derive(Debug, Clone)]
pub struct MigrationStep {
    pub source_version: ModelVersion,
    pub target_version: ModelVersion,
    pub source_schema: SchemaDefinition,
    pub target_schema: SchemaDefinition,
}

/// Ordered hops bridging the store's schema to the target schema.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    steps: Vec<MigrationStep>,
}

impl MigrationPlan {
    /// Compute the plan between two materialized schemas.
    ///
    /// Walks the inventory's ordered version list exactly once,
    /// materializing each version and matching boundaries by content
    /// hash (the caller only has opaque store metadata, so names are
    /// useless here). Every version between the first boundary found and
    /// the second, inclusive, joins the span; when the target turned up
    /// first the span is reversed after the walk, which yields the
    /// downgrade traversal without a second walk direction.
    ///
    /// An empty plan means one of the boundaries never appeared (or both
    /// landed on the same version) — the caller treats that as a failed
    /// migration, not as permission to touch the store.
    pub fn between(
        inventory: &ModelsInventory,
        source: &SchemaDefinition,
        target: &SchemaDefinition,
    ) -> Result<Self, InventoryError> {
        let source_hash = source.schema_hash();
        let target_hash = target.schema_hash();

        let mut span: Vec<(ModelVersion, SchemaDefinition)> = Vec::new();
        let mut reversed = false;
        let mut complete = false;

        for version in inventory.versions() {
            let schema = inventory.materialize(version)?;
            let hash = schema.schema_hash();
            let is_source = hash == source_hash;
            let is_target = hash == target_hash;

            if span.is_empty() {
                if is_source || is_target {
                    reversed = is_target && !is_source;
                    span.push((version.clone(), schema));
                    if is_source && is_target {
                        // Source and target are the same version.
                        complete = true;
                        break;
                    }
                }
            } else {
                span.push((version.clone(), schema));
                if is_source || is_target {
                    complete = true;
                    break;
                }
            }
        }

        if !complete {
            span.clear();
        }
        if reversed {
            span.reverse();
        }

        let mut steps = Vec::new();
        for pair in span.windows(2) {
            let (source_version, source_schema) = &pair[0];
            let (target_version, target_schema) = &pair[1];
            steps.push(MigrationStep {
                source_version: source_version.clone(),
                target_version: target_version.clone(),
                source_schema: source_schema.clone(),
                target_schema: target_schema.clone(),
            });
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}
