//! Mappings between two adjacent schema versions.
//!
//! A mapping describes how each target entity's fields are produced from a
//! source store: copied from a source field or filled with a fixed value.
//! Entities absent from the mapping are dropped — several historical
//! migrations exist purely to throw away a stale entity's rows.
//!
//! Resolution order: a custom registered mapping always wins; otherwise a
//! mapping is inferred structurally. Inference refuses schemas that are
//! too divergent (a field changed kind, or a required field appeared with
//! no default), which is exactly when a custom mapping must be written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::MappingError;
use crate::schema::definition::SchemaDefinition;
use crate::schema::value::FieldValue;

/// Where a target field's value comes from during a hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldSource {
    /// Copy the value of the named source field.
    CopyOf(String),
    /// Fill with a fixed value.
    Value(FieldValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub target_field: String,
    pub source: FieldSource,
}

impl FieldMapping {
    /// Copy a same-named field.
    pub fn copy<S: Into<String>>(field: S) -> Self {
        let field = field.into();
        Self {
            target_field: field.clone(),
            source: FieldSource::CopyOf(field),
        }
    }

    /// Copy from a differently-named source field.
    pub fn copied<S: Into<String>, T: Into<String>>(target_field: S, source_field: T) -> Self {
        Self {
            target_field: target_field.into(),
            source: FieldSource::CopyOf(source_field.into()),
        }
    }

    /// Fill the target field with a fixed value.
    pub fn value<S: Into<String>>(target_field: S, value: FieldValue) -> Self {
        Self {
            target_field: target_field.into(),
            source: FieldSource::Value(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub target_entity: String,
    /// Source entity the rows come from; `None` means the entity is new
    /// in the target version and starts empty.
    pub source_entity: Option<String>,
    pub field_mappings: Vec<FieldMapping>,
}

impl EntityMapping {
    pub fn from_entity<S: Into<String>, T: Into<String>>(
        target_entity: S,
        source_entity: T,
        field_mappings: Vec<FieldMapping>,
    ) -> Self {
        Self {
            target_entity: target_entity.into(),
            source_entity: Some(source_entity.into()),
            field_mappings,
        }
    }

    pub fn new_entity<S: Into<String>>(target_entity: S) -> Self {
        Self {
            target_entity: target_entity.into(),
            source_entity: None,
            field_mappings: Vec::new(),
        }
    }
}

/// A full mapping for one migration hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMapping {
    pub entity_mappings: Vec<EntityMapping>,
}

impl SchemaMapping {
    pub fn new(entity_mappings: Vec<EntityMapping>) -> Self {
        Self { entity_mappings }
    }

    /// Infer a mapping structurally.
    ///
    /// Entities match by name; source-only entities are dropped. Fields
    /// match by name when the kind is unchanged; added fields take their
    /// declared default, or `Null` when optional. A kind change or a
    /// required addition without a default fails inference.
    pub fn infer(
        source: &SchemaDefinition,
        target: &SchemaDefinition,
    ) -> Result<Self, MappingError> {
        let mut entity_mappings = Vec::new();

        for target_entity in &target.entities {
            let Some(source_entity) = source.entity(&target_entity.name) else {
                entity_mappings.push(EntityMapping::new_entity(&target_entity.name));
                continue;
            };

            let mut field_mappings = Vec::new();
            for field in &target_entity.fields {
                match source_entity.field(&field.name) {
                    Some(source_field) if source_field.kind == field.kind => {
                        field_mappings.push(FieldMapping::copy(&field.name));
                    }
                    Some(source_field) => {
                        return Err(MappingError::KindChanged {
                            entity: target_entity.name.clone(),
                            field: field.name.clone(),
                            from: source_field.kind.to_string(),
                            to: field.kind.to_string(),
                        });
                    }
                    None => {
                        let fill = match (&field.default, field.optional) {
                            (Some(default), _) => default.clone(),
                            (None, true) => FieldValue::Null,
                            (None, false) => {
                                return Err(MappingError::RequiredFieldAdded {
                                    entity: target_entity.name.clone(),
                                    field: field.name.clone(),
                                });
                            }
                        };
                        field_mappings.push(FieldMapping::value(&field.name, fill));
                    }
                }
            }

            entity_mappings.push(EntityMapping::from_entity(
                &target_entity.name,
                &source_entity.name,
                field_mappings,
            ));
        }

        Ok(Self::new(entity_mappings))
    }
}

/// Registry of custom mappings, consulted before inference.
///
/// Custom mappings are keyed by the (source, target) schema hash pair, so
/// a registration applies to the structural versions it was written for
/// regardless of what the catalog names them.
#[derive(Debug, Clone, Default)]
pub struct MappingResolver {
    custom: BTreeMap<(String, String), SchemaMapping>,
}

impl MappingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hand-written mapping for one hop.
    pub fn register(
        &mut self,
        source: &SchemaDefinition,
        target: &SchemaDefinition,
        mapping: SchemaMapping,
    ) {
        self.custom
            .insert((source.schema_hash(), target.schema_hash()), mapping);
    }

    /// Resolve the mapping for one hop: custom first, inferred otherwise.
    pub fn resolve(
        &self,
        source: &SchemaDefinition,
        target: &SchemaDefinition,
    ) -> Result<SchemaMapping, MappingError> {
        let key = (source.schema_hash(), target.schema_hash());
        if let Some(mapping) = self.custom.get(&key) {
            return Ok(mapping.clone());
        }

        SchemaMapping::infer(source, target).map_err(|reason| MappingError::NoMappingAvailable {
            source_version: source.name.clone(),
            target_version: target.name.clone(),
            reason: reason.to_string(),
        })
    }
}
