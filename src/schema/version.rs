//! Schema version names and their migration ordering.
//!
//! Version names share a common prefix with an optional trailing revision
//! number ("Model", "Model 1", ... "Model 23"). Migration order is the
//! numeric order of those revisions, so comparison must treat digit runs
//! as integers: plain lexical ordering would file "Model 10" before
//! "Model 2" and walk history out of order.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::path::PathBuf;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// File extension for schema definition documents inside a package.
pub const SCHEMA_EXTENSION: &str = "schema.json";

/// One named schema revision, e.g. `"Model 13"`.
///
/// Constructed at inventory load time from the on-disk version descriptor
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[display("{name}")]
#[serde(transparent)]
pub struct ModelVersion {
    name: String,
}

impl ModelVersion {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    /// The version identifier, excluding any file extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name of this version's schema document in the flat layout.
    pub fn schema_file_name(&self) -> String {
        format!("{}.{}", self.name, SCHEMA_EXTENSION)
    }

    /// Relative path of this version's schema document in the nested
    /// layout, where each version gets its own subdirectory.
    pub fn nested_schema_path(&self) -> PathBuf {
        PathBuf::from(&self.name).join(self.schema_file_name())
    }
}

impl From<&str> for ModelVersion {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialOrd for ModelVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModelVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_numeric_aware(&self.name, &other.name)
    }
}

/// Numeric-aware string comparison.
///
/// Digit runs compare as integers (so `"Model 2" < "Model 10"`), every
/// other character compares as usual. A missing suffix sorts first, which
/// keeps an unnumbered base version ("Model") ahead of "Model 1".
pub fn compare_numeric_aware(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digit_run(&mut ca);
                let run_b = take_digit_run(&mut cb);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                ca.next();
                cb.next();
            }
        }
    }
}

fn take_digit_run<I: Iterator<Item = char>>(chars: &mut Peekable<I>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(*c);
        chars.next();
    }
    run
}

/// Compare two digit runs by integer value without parsing, so version
/// numbers of any length stay exact.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_sort_order() {
        let mut versions: Vec<ModelVersion> =
            ["Model 10", "Model 1", "Model 23", "Model 2", "Model"]
                .into_iter()
                .map(ModelVersion::from)
                .collect();

        versions.sort();

        let names: Vec<&str> = versions.iter().map(|v| v.name()).collect();
        assert_eq!(names, ["Model", "Model 1", "Model 2", "Model 10", "Model 23"]);
    }

    #[test]
    fn test_digit_runs_compare_by_value() {
        assert_eq!(compare_numeric_aware("Model 2", "Model 10"), Ordering::Less);
        assert_eq!(compare_numeric_aware("Model 10", "Model 10"), Ordering::Equal);
        assert_eq!(compare_numeric_aware("Model 007", "Model 7"), Ordering::Equal);
        assert_eq!(compare_numeric_aware("Model 12", "Model 9"), Ordering::Greater);
    }

    #[test]
    fn test_unnumbered_base_version_sorts_first() {
        assert_eq!(compare_numeric_aware("Model", "Model 1"), Ordering::Less);
        assert_eq!(compare_numeric_aware("Model 1", "Model"), Ordering::Greater);
    }

    #[test]
    fn test_schema_file_names() {
        let version = ModelVersion::new("Model 13");
        assert_eq!(version.schema_file_name(), "Model 13.schema.json");
        assert_eq!(
            version.nested_schema_path(),
            PathBuf::from("Model 13").join("Model 13.schema.json")
        );
    }
}
