//! Structural schema definitions and their content hash.
//!
//! A [`SchemaDefinition`] is the loadable description of one schema
//! version: the entities the store holds and the fields each entity
//! carries. Definitions are compared by content hash, never by name —
//! store metadata only tells us what a store's schema *looks like*, not
//! what the catalog calls it.

use rs_merkle::{Hasher, MerkleTree, algorithms::Sha256};
use serde::{Deserialize, Serialize};

use crate::schema::value::{FieldKind, FieldValue};

/// Structural description of one schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Display label, conventionally the version name. Not part of the
    /// content hash.
    pub name: String,
    pub entities: Vec<EntityDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub optional: bool,
    /// Value used to fill this field when an inferred mapping migrates
    /// records from a version that did not have it.
    #[serde(default)]
    pub default: Option<FieldValue>,
}

impl SchemaDefinition {
    pub fn new<S: Into<String>>(name: S, entities: Vec<EntityDefinition>) -> Self {
        Self {
            name: name.into(),
            entities,
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Hex merkle root over the canonical entity/field leaves.
    ///
    /// The hash covers entity names, field names, kinds and optionality;
    /// it deliberately excludes the definition's display name and field
    /// defaults, so renaming a catalog entry or tweaking a fill-in value
    /// never makes an on-disk store look incompatible. Leaves are sorted
    /// before hashing, making the hash stable across declaration order.
    pub fn schema_hash(&self) -> String {
        let mut leaves: Vec<[u8; 32]> = Vec::new();

        for entity in &self.entities {
            leaves.push(Sha256::hash(format!("entity:{}", entity.name).as_bytes()));
            for field in &entity.fields {
                let descriptor = format!(
                    "field:{}.{}:{}:{}",
                    entity.name,
                    field.name,
                    field.kind,
                    if field.optional { "optional" } else { "required" },
                );
                leaves.push(Sha256::hash(descriptor.as_bytes()));
            }
        }

        leaves.sort_unstable();

        let root = MerkleTree::<Sha256>::from_leaves(&leaves)
            .root()
            .unwrap_or_else(|| Sha256::hash(b""));
        hex_encode(&root)
    }

    /// Structural equality: same entities, fields, kinds and optionality.
    pub fn structurally_matches(&self, other: &SchemaDefinition) -> bool {
        self.schema_hash() == other.schema_hash()
    }
}

impl EntityDefinition {
    pub fn new<S: Into<String>>(name: S, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FieldDefinition {
    pub fn required<S: Into<String>>(name: S, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
        }
    }

    pub fn optional<S: Into<String>>(name: S, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: true,
            default: None,
        }
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
