//! File metadata structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog-assigned file identifier
///
/// Identifiers start at 1 and grow by one per inserted file. They are never
/// reused within the lifetime of a catalog, so a stale identifier can only
/// ever resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct FileId(u64);

impl FileId {
    /// First identifier handed out by a fresh catalog
    pub const FIRST: FileId = FileId(1);

    pub fn new(id: u64) -> Self {
        FileId(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The identifier that follows this one
    pub(crate) fn next(self) -> Self {
        FileId(self.0 + 1)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FileId> for u64 {
    fn from(id: FileId) -> u64 {
        id.0
    }
}

/// File metadata stored in the catalog
///
/// Records are immutable once created and shared (via `Arc`) between the
/// directory tree leaf and the file table. The secondary indexes refer to a
/// record only through its [`FileId`].
///
/// `extension` and `create_time` are opaque: the catalog never derives the
/// extension from the name and only compares timestamps for equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Identifier assigned on insert
    pub file_id: FileId,

    /// Leaf name within its directory
    pub file_name: String,

    /// Extension, conventionally with the leading `.` (e.g. ".txt")
    pub extension: String,

    /// File size in bytes
    pub file_size: u64,

    /// Owning user
    pub owner: String,

    /// Creation timestamp, equality-compared only
    pub create_time: String,

    /// Normalized absolute path, composed at insert time
    pub full_path: String,
}

impl FileMetadata {
    /// Create a new metadata record
    pub fn new(
        file_id: FileId,
        file_name: impl Into<String>,
        extension: impl Into<String>,
        file_size: u64,
        owner: impl Into<String>,
        create_time: impl Into<String>,
        full_path: impl Into<String>,
    ) -> Self {
        FileMetadata {
            file_id,
            file_name: file_name.into(),
            extension: extension.into(),
            file_size,
            owner: owner.into(),
            create_time: create_time.into(),
            full_path: full_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_creation() {
        let meta = FileMetadata::new(FileId::new(7), "x", ".txt", 100, "u", "2024-1-1", "/a/x");
        assert_eq!(meta.file_id, FileId::new(7));
        assert_eq!(meta.file_name, "x");
        assert_eq!(meta.extension, ".txt");
        assert_eq!(meta.file_size, 100);
        assert_eq!(meta.owner, "u");
        assert_eq!(meta.create_time, "2024-1-1");
        assert_eq!(meta.full_path, "/a/x");
    }

    #[test]
    fn test_file_id_ordering() {
        assert_eq!(FileId::FIRST.get(), 1);
        assert_eq!(FileId::FIRST.next(), FileId::new(2));
        assert!(FileId::new(3) < FileId::new(10));
        assert_eq!(FileId::new(42).to_string(), "42");
    }

    #[test]
    fn test_serialization() {
        let meta = FileMetadata::new(FileId::new(3), "report", ".pdf", 2048, "admin", "2024-3-4", "/docs/report");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"file_id\":3"));

        let deserialized: FileMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, meta);
    }
}
