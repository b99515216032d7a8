//! Hierarchical directory tree
//!
//! Interior nodes are directories owning their children by name; leaves are
//! files holding a shared reference to their metadata record. Nodes carry no
//! parent pointer: removal resolves the parent directory from the path and
//! detaches the leaf by name, so ownership only ever points downward.
//!
//! Directories are created implicitly on insert and are never pruned.

use crate::core::error::{CatalogError, Result};
use crate::core::metadata::FileMetadata;
use crate::core::validation::join_path;
use ahash::AHashMap;
use std::sync::Arc;

/// Node payload
#[derive(Debug)]
pub enum NodeKind {
    /// Directory with its children keyed by name
    Directory(AHashMap<String, DirectoryNode>),
    /// File leaf
    File(Arc<FileMetadata>),
}

/// Named node in the directory tree
#[derive(Debug)]
pub struct DirectoryNode {
    name: String,
    kind: NodeKind,
}

impl DirectoryNode {
    /// Create an empty directory node
    pub fn directory(name: impl Into<String>) -> Self {
        DirectoryNode {
            name: name.into(),
            kind: NodeKind::Directory(AHashMap::new()),
        }
    }

    /// Create a file leaf named after its metadata
    pub fn file(metadata: Arc<FileMetadata>) -> Self {
        DirectoryNode {
            name: metadata.file_name.clone(),
            kind: NodeKind::File(metadata),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Metadata of a file leaf; `None` for directories
    pub fn metadata(&self) -> Option<&Arc<FileMetadata>> {
        match &self.kind {
            NodeKind::File(metadata) => Some(metadata),
            NodeKind::Directory(_) => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&DirectoryNode> {
        match &self.kind {
            NodeKind::Directory(children) => children.get(name),
            NodeKind::File(_) => None,
        }
    }

    /// Children of a directory; empty for files
    pub fn children(&self) -> impl Iterator<Item = &DirectoryNode> {
        let children = match &self.kind {
            NodeKind::Directory(children) => Some(children.values()),
            NodeKind::File(_) => None,
        };
        children.into_iter().flatten()
    }

    /// Attach a child, replacing any existing child of the same name
    ///
    /// Returns the displaced node. Attaching to a file leaf is refused and
    /// hands the node back as `Err`.
    pub(crate) fn attach(
        &mut self,
        node: DirectoryNode,
    ) -> std::result::Result<Option<DirectoryNode>, DirectoryNode> {
        match &mut self.kind {
            NodeKind::Directory(children) => Ok(children.insert(node.name.clone(), node)),
            NodeKind::File(_) => Err(node),
        }
    }

    pub(crate) fn detach(&mut self, name: &str) -> Option<DirectoryNode> {
        match &mut self.kind {
            NodeKind::Directory(children) => children.remove(name),
            NodeKind::File(_) => None,
        }
    }
}

/// Rooted directory tree
#[derive(Debug)]
pub struct DirectoryTree {
    root: DirectoryNode,
}

impl DirectoryTree {
    pub fn new() -> Self {
        DirectoryTree {
            root: DirectoryNode::directory("/"),
        }
    }

    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    /// Descend to the directory at `segments`, creating missing directories
    ///
    /// Fails with `NotADirectory` if an existing component is a file. The
    /// check happens before anything is created: a file can only be met
    /// while walking existing nodes, since every node created here is a
    /// directory.
    pub fn get_or_create_dir(&mut self, segments: &[&str]) -> Result<&mut DirectoryNode> {
        let mut current = &mut self.root;

        for (depth, segment) in segments.iter().enumerate() {
            current = match &mut current.kind {
                NodeKind::Directory(children) => children
                    .entry((*segment).to_string())
                    .or_insert_with(|| DirectoryNode::directory(*segment)),
                NodeKind::File(_) => {
                    return Err(CatalogError::NotADirectory(join_path(&segments[..depth])));
                }
            };
        }

        if current.is_directory() {
            Ok(current)
        } else {
            Err(CatalogError::NotADirectory(join_path(segments)))
        }
    }

    /// Descend to the node at `segments` without creating anything
    pub fn find(&self, segments: &[&str]) -> Option<&DirectoryNode> {
        let mut current = &self.root;
        for segment in segments {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub(crate) fn find_mut(&mut self, segments: &[&str]) -> Option<&mut DirectoryNode> {
        let mut current = &mut self.root;
        for segment in segments {
            current = match &mut current.kind {
                NodeKind::Directory(children) => children.get_mut(*segment)?,
                NodeKind::File(_) => return None,
            };
        }
        Some(current)
    }

    /// Visit every file leaf depth-first
    pub fn walk_files<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<FileMetadata>),
    {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match &node.kind {
                NodeKind::File(metadata) => visit(metadata),
                NodeKind::Directory(children) => stack.extend(children.values()),
            }
        }
    }

    /// Visit every file leaf together with the path it was reached by
    pub fn walk_files_with_path<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &Arc<FileMetadata>),
    {
        fn descend<F>(node: &DirectoryNode, path: &mut String, visit: &mut F)
        where
            F: FnMut(&str, &Arc<FileMetadata>),
        {
            let mark = path.len();
            path.push('/');
            path.push_str(&node.name);

            match &node.kind {
                NodeKind::File(metadata) => visit(path.as_str(), metadata),
                NodeKind::Directory(children) => {
                    for child in children.values() {
                        descend(child, path, visit);
                    }
                }
            }

            path.truncate(mark);
        }

        let mut path = String::new();
        for child in self.root.children() {
            descend(child, &mut path, &mut visit);
        }
    }
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}
