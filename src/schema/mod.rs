//! Schema versioning: version names, structural definitions, the on-disk
//! version catalog, and mappings between adjacent versions.

pub mod definition;
pub mod inventory;
pub mod mapping;
pub mod value;
pub mod version;

pub use definition::{EntityDefinition, FieldDefinition, SchemaDefinition};
pub use inventory::ModelsInventory;
pub use mapping::{EntityMapping, FieldMapping, FieldSource, MappingResolver, SchemaMapping};
pub use value::{FieldKind, FieldValue};
pub use version::ModelVersion;
