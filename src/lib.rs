//! # file-catalog - Indexed In-Memory File Metadata Catalog
//!
//! `file-catalog` keeps file metadata in a hierarchical directory tree and,
//! alongside it, a multi-attribute inverted index so attribute lookups do not
//! have to walk the tree:
//!
//! - **Directory tree** stays authoritative for path-based operations
//! - **File table** maps each assigned [`FileId`] to its metadata
//! - **Inverted index** by extension, owner, creation time and size (with
//!   range scans over size)
//! - **Concurrent access**: many readers, exclusive writers, no torn reads
//!
//! ## Quick Start
//!
//! ```rust
//! use file_catalog::{Catalog, Result};
//!
//! # fn main() -> Result<()> {
//! let catalog = Catalog::new();
//!
//! // Directories are created as needed
//! catalog.add_file("/home/user1", "holiday", ".jpg", 3_500_000, "user1", "2024-6-12")?;
//! catalog.add_file("/documents", "taxes", ".pdf", 120_000, "user1", "2024-4-1")?;
//!
//! // Indexed lookups
//! let jpgs = catalog.query_by_extension_indexed(".jpg");
//! assert_eq!(jpgs[0].full_path, "/home/user1/holiday");
//!
//! let mid_sized = catalog.query_by_size_range_indexed(100_000, 1_000_000);
//! assert_eq!(mid_sized.len(), 1);
//!
//! // The same answer from a full tree walk
//! assert_eq!(catalog.query_by_extension_traditional(".jpg").len(), 1);
//!
//! catalog.remove_file("/documents/taxes")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use file_catalog::{CatalogBuilder, DuplicatePolicy};
//!
//! let catalog = CatalogBuilder::new()
//!     .duplicate_policy(DuplicatePolicy::Replace)
//!     .initial_capacity(50_000)
//!     .build();
//!
//! catalog.add_file("/tmp", "a", ".txt", 1, "u", "t").unwrap();
//! catalog.add_file("/tmp", "a", ".txt", 2, "u", "t").unwrap(); // replaces
//! assert_eq!(catalog.total_files(), 1);
//! ```

pub mod core;

pub use crate::core::{
    catalog::Catalog,
    config::{CatalogConfig, DuplicatePolicy},
    error::{CatalogError, Result},
    index::{IndexKey, IndexStats, InvertedIndex},
    metadata::{FileId, FileMetadata},
    posting::PostingList,
};

use std::path::Path;
use tracing::info;

/// Builder for customizing Catalog creation
///
/// Provides a fluent API over [`CatalogConfig`].
///
/// # Examples
///
/// ```rust
/// use file_catalog::CatalogBuilder;
///
/// let catalog = CatalogBuilder::new()
///     .initial_capacity(10_000)
///     .build();
/// assert_eq!(catalog.config().initial_capacity, 10_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    config: CatalogConfig,
}

impl CatalogBuilder {
    /// Create a new CatalogBuilder with default settings
    pub fn new() -> Self {
        CatalogBuilder {
            config: CatalogConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: CatalogConfig) -> Self {
        CatalogBuilder { config }
    }

    /// Start from a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading catalog configuration from {:?}", path.as_ref());
        Ok(Self::from_config(CatalogConfig::load(path)?))
    }

    /// Set how same-name files in one directory are handled
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Reserve room for this many files up front
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Build the Catalog instance
    pub fn build(self) -> Catalog {
        Catalog::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let catalog = CatalogBuilder::new().build();
        assert_eq!(catalog.config(), &CatalogConfig::default());
        assert_eq!(catalog.total_files(), 0);
        assert_eq!(catalog.next_file_id(), FileId::FIRST);
    }

    #[test]
    fn test_builder_settings() {
        let catalog = CatalogBuilder::new()
            .duplicate_policy(DuplicatePolicy::Replace)
            .initial_capacity(128)
            .build();

        assert_eq!(catalog.config().duplicate_policy, DuplicatePolicy::Replace);
        assert_eq!(catalog.config().initial_capacity, 128);
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
        assert_send_sync::<InvertedIndex>();
    }
}
