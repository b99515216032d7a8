//! Primary file table
//!
//! Maps each [`FileId`] to its metadata record. The table is the
//! authority the indexed queries resolve identifiers through; it is guarded
//! by the catalog lock, not by a lock of its own.

use crate::core::metadata::{FileId, FileMetadata};
use ahash::AHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct FileTable {
    files: AHashMap<FileId, Arc<FileMetadata>>,
}

impl FileTable {
    pub fn new() -> Self {
        FileTable {
            files: AHashMap::new(),
        }
    }

    /// Create a table with room for `capacity` files
    pub fn with_capacity(capacity: usize) -> Self {
        FileTable {
            files: AHashMap::with_capacity(capacity),
        }
    }

    /// Insert a record under its own identifier, returning any displaced record
    pub fn insert(&mut self, file: Arc<FileMetadata>) -> Option<Arc<FileMetadata>> {
        self.files.insert(file.file_id, file)
    }

    pub fn remove(&mut self, id: FileId) -> Option<Arc<FileMetadata>> {
        self.files.remove(&id)
    }

    pub fn get(&self, id: FileId) -> Option<&Arc<FileMetadata>> {
        self.files.get(&id)
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.files.contains_key(&id)
    }

    /// Resolve identifiers to records, skipping any that are absent
    pub fn resolve(&self, ids: &[FileId]) -> Vec<Arc<FileMetadata>> {
        ids.iter()
            .filter_map(|id| self.files.get(id).cloned())
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.files.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FileMetadata>> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
