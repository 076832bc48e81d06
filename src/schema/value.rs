//! Field kinds and generic field values.
//!
//! Records migrate through schema versions as generic values rather than
//! typed structs, because the set of schema versions is data discovered at
//! runtime, not types known at compile time. The list kinds exist because
//! the store carries list-typed attributes (related product IDs, attribute
//! options) that must survive migration intact.

use derive_more::From;
use serde::{Deserialize, Serialize};

/// The declared type of a schema field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
    Blob,
    IntList,
    TextList,
}

/// A single field value inside a record.
///
/// `Null` stands for an absent optional value and carries no kind.
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    IntList(Vec<i64>),
    TextList(Vec<String>),
}

impl FieldValue {
    /// The kind this value satisfies, or `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(_) => Some(FieldKind::Bool),
            FieldValue::Int(_) => Some(FieldKind::Int),
            FieldValue::Float(_) => Some(FieldKind::Float),
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Blob(_) => Some(FieldKind::Blob),
            FieldValue::IntList(_) => Some(FieldKind::IntList),
            FieldValue::TextList(_) => Some(FieldKind::TextList),
        }
    }

    /// Short name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            None => "null",
            Some(FieldKind::Bool) => "bool",
            Some(FieldKind::Int) => "int",
            Some(FieldKind::Float) => "float",
            Some(FieldKind::Text) => "text",
            Some(FieldKind::Blob) => "blob",
            Some(FieldKind::IntList) => "int_list",
            Some(FieldKind::TextList) => "text_list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert_eq!(FieldValue::Int(3).kind(), Some(FieldKind::Int));
        assert_eq!(FieldValue::from("hi").kind(), Some(FieldKind::Text));
        assert_eq!(FieldValue::IntList(vec![1, 2]).kind(), Some(FieldKind::IntList));
        assert_eq!(FieldValue::Null.kind(), None);
    }

    #[test]
    fn test_kind_round_trips_through_strings() {
        use std::str::FromStr;
        assert_eq!(FieldKind::IntList.to_string(), "int_list");
        assert_eq!(FieldKind::from_str("text_list").unwrap(), FieldKind::TextList);
    }
}
