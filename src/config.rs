//! Migration configuration.
//!
//! Explicitly constructed and passed by reference — the storage layer
//! carries no ambient global settings.

use typed_builder::TypedBuilder;

/// Settings for the staged migration file dance.
///
/// # Examples
///
/// ```
/// use shopstore::config::MigrationConfig;
///
/// // Defaults
/// let config = MigrationConfig::default();
/// assert_eq!(config.staging_dir_name, "migration");
///
/// // Customized directory names
/// let config = MigrationConfig::builder()
///     .staging_dir_name("migration-scratch")
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct MigrationConfig {
    /// Name of the sibling directory migrated stores are staged in
    /// before being swapped into place.
    #[builder(default = String::from("migration"), setter(into))]
    pub staging_dir_name: String,

    /// Name of the sibling directory the original store is held in
    /// while the swap runs.
    #[builder(default = String::from("backup"), setter(into))]
    pub backup_dir_name: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::default();
        assert_eq!(config.staging_dir_name, "migration");
        assert_eq!(config.backup_dir_name, "backup");
    }

    #[test]
    fn test_builder_overrides() {
        let config = MigrationConfig::builder()
            .staging_dir_name("scratch")
            .backup_dir_name("hold")
            .build();
        assert_eq!(config.staging_dir_name, "scratch");
        assert_eq!(config.backup_dir_name, "hold");
    }
}
