//! Indexed file catalog
//!
//! The catalog composes three structures that must agree at every
//! observable point:
//! - the directory tree (authoritative for paths)
//! - the file table (identifier -> metadata)
//! - the inverted index (attribute -> identifiers)
//!
//! # Locking
//!
//! Two readers-writer locks: the catalog lock guards the tree, the table
//! and the identifier counter; the index carries its own lock. Mutations
//! hold the catalog lock exclusively and take the index lock second, always
//! in that order. Indexed queries read the index, release it, then resolve
//! identifiers under the shared catalog lock. Identifiers are never reused,
//! so an identifier removed between the two phases simply resolves to
//! nothing.

use crate::core::config::{CatalogConfig, DuplicatePolicy};
use crate::core::error::{CatalogError, Result};
use crate::core::index::{IndexStats, InvertedIndex};
use crate::core::metadata::{FileId, FileMetadata};
use crate::core::table::FileTable;
use crate::core::tree::{DirectoryNode, DirectoryTree};
use crate::core::validation;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// State guarded by the catalog lock
#[derive(Debug)]
struct CatalogState {
    tree: DirectoryTree,
    table: FileTable,
    next_file_id: FileId,
}

/// In-memory file metadata catalog with attribute indexes
///
/// `Catalog` is `Send + Sync`; share it between threads with `Arc`.
///
/// # Examples
///
/// ```
/// use file_catalog::Catalog;
///
/// # fn main() -> file_catalog::Result<()> {
/// let catalog = Catalog::new();
/// catalog.add_file("/pictures", "beach", ".jpg", 2_400_000, "alice", "2024-7-1")?;
/// catalog.add_file("/documents", "cv", ".pdf", 80_000, "alice", "2024-7-2")?;
///
/// let photos = catalog.query_by_extension_indexed(".jpg");
/// assert_eq!(photos[0].full_path, "/pictures/beach");
///
/// let small = catalog.query_by_size_range_indexed(0, 100_000);
/// assert_eq!(small.len(), 1);
///
/// catalog.remove_file("/pictures/beach")?;
/// assert_eq!(catalog.total_files(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Catalog {
    config: CatalogConfig,
    state: RwLock<CatalogState>,
    index: InvertedIndex,
}

impl Catalog {
    /// Create an empty catalog with default configuration
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create an empty catalog with the given configuration
    pub fn with_config(config: CatalogConfig) -> Self {
        info!(
            "Creating catalog (duplicate policy {:?}, capacity {})",
            config.duplicate_policy, config.initial_capacity
        );

        Catalog {
            state: RwLock::new(CatalogState {
                tree: DirectoryTree::new(),
                table: FileTable::with_capacity(config.initial_capacity),
                next_file_id: FileId::FIRST,
            }),
            index: InvertedIndex::new(),
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Add a file under `dir_path`, creating missing directories
    ///
    /// Returns the identifier assigned to the new file.
    ///
    /// # Errors
    ///
    /// - `MalformedPath` if `dir_path` does not start with `/`
    /// - `InvalidName` if `name` is empty or contains `/`
    /// - `NotADirectory` if a component of `dir_path` is a file
    /// - `AlreadyExists` if a directory occupies `name`, or a file does and
    ///   the duplicate policy is `Reject`
    ///
    /// On error the catalog is left unchanged.
    pub fn add_file(
        &self,
        dir_path: &str,
        name: &str,
        extension: &str,
        size: u64,
        owner: &str,
        create_time: &str,
    ) -> Result<FileId> {
        let segments = validation::split_path(dir_path)?;
        validation::validate_file_name(name)?;

        let mut guard = self.state.write();
        let CatalogState {
            tree,
            table,
            next_file_id,
        } = &mut *guard;

        let dir = tree.get_or_create_dir(&segments)?;
        let full_path = validation::compose_full_path(&segments, name);

        if let Some(existing) = dir.child(name) {
            let displaced = match (existing.metadata(), self.config.duplicate_policy) {
                (Some(file), DuplicatePolicy::Replace) => Arc::clone(file),
                _ => return Err(CatalogError::AlreadyExists(full_path)),
            };

            warn!(
                "Replacing file {} at {} with a new record",
                displaced.file_id, full_path
            );
            self.index.remove(&displaced);
            table.remove(displaced.file_id);
            dir.detach(name);
        }

        let file_id = *next_file_id;
        *next_file_id = file_id.next();

        let metadata = Arc::new(FileMetadata::new(
            file_id,
            name,
            extension,
            size,
            owner,
            create_time,
            full_path,
        ));

        // `dir` is a directory, checked by get_or_create_dir
        if dir.attach(DirectoryNode::file(Arc::clone(&metadata))).is_err() {
            return Err(CatalogError::NotADirectory(validation::join_path(&segments)));
        }
        table.insert(Arc::clone(&metadata));
        self.index.add(&metadata);

        debug!("Added file {} at {}", file_id, metadata.full_path);
        Ok(file_id)
    }

    /// Remove the file at `full_path`
    ///
    /// Returns the removed record. Directories left empty are kept.
    ///
    /// # Errors
    ///
    /// - `MalformedPath` if `full_path` does not start with `/`
    /// - `NotFound` if nothing exists at `full_path`
    /// - `NotAFile` if `full_path` names a directory (including `/`)
    pub fn remove_file(&self, full_path: &str) -> Result<Arc<FileMetadata>> {
        let segments = validation::split_path(full_path)?;
        let Some((name, parent_segments)) = segments.split_last() else {
            return Err(CatalogError::NotAFile(full_path.to_string()));
        };

        let mut guard = self.state.write();
        let CatalogState { tree, table, .. } = &mut *guard;

        let parent = tree
            .find_mut(parent_segments)
            .ok_or_else(|| CatalogError::NotFound(full_path.to_string()))?;
        let node = parent
            .child(name)
            .ok_or_else(|| CatalogError::NotFound(full_path.to_string()))?;
        let metadata = match node.metadata() {
            Some(metadata) => Arc::clone(metadata),
            None => return Err(CatalogError::NotAFile(full_path.to_string())),
        };

        self.index.remove(&metadata);
        table.remove(metadata.file_id);
        parent.detach(name);

        debug!("Removed file {} at {}", metadata.file_id, metadata.full_path);
        Ok(metadata)
    }

    /// Files matching `predicate`, found by walking the whole tree
    ///
    /// Result order is unspecified.
    pub fn query_traditional<F>(&self, predicate: F) -> Vec<Arc<FileMetadata>>
    where
        F: Fn(&FileMetadata) -> bool,
    {
        let state = self.state.read();
        let mut result = Vec::new();
        state.tree.walk_files(|file| {
            if predicate(&**file) {
                result.push(Arc::clone(file));
            }
        });
        result
    }

    /// Files with the given extension, found by walking the whole tree
    pub fn query_by_extension_traditional(&self, extension: &str) -> Vec<Arc<FileMetadata>> {
        let result = self.query_traditional(|file| file.extension == extension);
        trace!("Tree walk for extension {} found {} files", extension, result.len());
        result
    }

    /// Files with the given extension, in ascending identifier order
    pub fn query_by_extension_indexed(&self, extension: &str) -> Vec<Arc<FileMetadata>> {
        let ids = self.index.query_by_extension(extension);
        self.resolve(&ids)
    }

    /// Files with `min_size <= size <= max_size`, in ascending identifier order
    pub fn query_by_size_range_indexed(
        &self,
        min_size: u64,
        max_size: u64,
    ) -> Vec<Arc<FileMetadata>> {
        let ids = self.index.query_by_size_range(min_size, max_size);
        self.resolve(&ids)
    }

    /// Files owned by `owner`, in ascending identifier order
    pub fn query_by_owner_indexed(&self, owner: &str) -> Vec<Arc<FileMetadata>> {
        let ids = self.index.query_by_owner(owner);
        self.resolve(&ids)
    }

    /// Files created at exactly `create_time`, in ascending identifier order
    pub fn query_by_time_indexed(&self, create_time: &str) -> Vec<Arc<FileMetadata>> {
        let ids = self.index.query_by_time(create_time);
        self.resolve(&ids)
    }

    /// Second phase of an indexed query: ids to records under the catalog lock
    fn resolve(&self, ids: &[FileId]) -> Vec<Arc<FileMetadata>> {
        let state = self.state.read();
        let result = state.table.resolve(ids);
        trace!("Resolved {} of {} indexed ids", result.len(), ids.len());
        result
    }

    /// Look up a file by identifier
    pub fn get(&self, file_id: FileId) -> Option<Arc<FileMetadata>> {
        self.state.read().table.get(file_id).cloned()
    }

    /// Look up a file by full path
    pub fn metadata(&self, full_path: &str) -> Result<Arc<FileMetadata>> {
        let segments = validation::split_path(full_path)?;
        let state = self.state.read();
        let node = state
            .tree
            .find(&segments)
            .ok_or_else(|| CatalogError::NotFound(full_path.to_string()))?;

        node.metadata()
            .cloned()
            .ok_or_else(|| CatalogError::NotAFile(full_path.to_string()))
    }

    /// Whether a file or directory exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        match validation::split_path(path) {
            Ok(segments) => self.state.read().tree.find(&segments).is_some(),
            Err(_) => false,
        }
    }

    /// Names of the entries directly inside the directory at `path`, sorted
    pub fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let segments = validation::split_path(path)?;
        let state = self.state.read();
        let node = state
            .tree
            .find(&segments)
            .ok_or_else(|| CatalogError::NotFound(path.to_string()))?;

        if !node.is_directory() {
            return Err(CatalogError::NotADirectory(path.to_string()));
        }

        let mut names: Vec<String> = node.children().map(|child| child.name().to_string()).collect();
        names.sort();
        Ok(names)
    }

    /// Number of files in the catalog
    pub fn total_files(&self) -> usize {
        self.state.read().table.len()
    }

    /// Bytes used by the inverted index posting lists
    pub fn index_memory_footprint(&self) -> usize {
        self.index.memory_footprint()
    }

    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// The identifier the next `add_file` will assign
    pub fn next_file_id(&self) -> FileId {
        self.state.read().next_file_id
    }

    /// The underlying inverted index
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Check that the tree, the file table and the index agree
    ///
    /// Verifies that:
    /// - tree leaves and table entries hold the same identifiers and share
    ///   the same records
    /// - every leaf's `full_path` matches the path it is reached by
    /// - every identifier is below the next identifier to be assigned
    /// - the index lists each file exactly once per attribute, under its
    ///   own value, with no empty or unordered posting lists
    pub fn verify(&self) -> Result<()> {
        let state = self.state.read();

        let mut seen = HashSet::with_capacity(state.table.len());
        let mut problem = None;
        state.tree.walk_files_with_path(|path, file| {
            if problem.is_some() {
                return;
            }
            if file.full_path != path {
                problem = Some(format!(
                    "file {} reached at {} records path {}",
                    file.file_id, path, file.full_path
                ));
            } else if !seen.insert(file.file_id) {
                problem = Some(format!("file {} appears twice in the tree", file.file_id));
            } else if file.file_id >= state.next_file_id {
                problem = Some(format!("file {} was never assigned", file.file_id));
            } else {
                match state.table.get(file.file_id) {
                    Some(record) if Arc::ptr_eq(record, file) => {}
                    Some(_) => {
                        problem = Some(format!(
                            "file {} differs between tree and table",
                            file.file_id
                        ))
                    }
                    None => problem = Some(format!("file {} missing from table", file.file_id)),
                }
            }
        });

        if let Some(problem) = problem {
            return Err(CatalogError::Inconsistent(problem));
        }
        if seen.len() != state.table.len() {
            return Err(CatalogError::Inconsistent(format!(
                "table holds {} files but the tree reaches {}",
                state.table.len(),
                seen.len()
            )));
        }

        self.index.verify_against(&state.table)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
