//! Catalog configuration
//!
//! Configuration is plain data with serde defaults, so an empty TOML
//! document yields the default catalog:
//!
//! ```toml
//! duplicate_policy = "reject"   # or "replace"
//! initial_capacity = 10000
//! ```

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What `add_file` does when the target directory already holds a file of
/// the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `AlreadyExists` and leave the catalog untouched
    #[default]
    Reject,
    /// Fully remove the existing file (index and table included), then add
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Handling of same-name files within one directory
    pub duplicate_policy: DuplicatePolicy,

    /// Number of files to reserve room for in the file table
    pub initial_capacity: usize,
}

impl CatalogConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CatalogError;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.initial_capacity, 0);

        assert_eq!(CatalogConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_parse_toml() {
        let config = CatalogConfig::from_toml_str(
            r#"
            duplicate_policy = "replace"
            initial_capacity = 50000
            "#,
        )
        .unwrap();

        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
        assert_eq!(config.initial_capacity, 50_000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CatalogConfig::from_toml_str("initial_capacity = 8").unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.initial_capacity, 8);
    }

    #[test]
    fn test_invalid_toml() {
        let err = CatalogConfig::from_toml_str("duplicate_policy = \"overwrite\"").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));

        let err = CatalogConfig::from_toml_str("initial_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CatalogConfig::load("/nonexistent/catalog.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
