//! Multi-attribute inverted index
//!
//! Four secondary indexes map an attribute value to the posting list of
//! every file carrying that value:
//! - extension -> posting list
//! - owner -> posting list
//! - create time -> posting list
//! - file size -> posting list (ordered, so size ranges are a range scan)
//!
//! All four maps sit behind one readers-writer lock. Adding or removing a
//! file touches the four maps under a single exclusive acquisition, so a
//! reader never observes a file in some indexes but not in others.

use crate::core::error::{CatalogError, Result};
use crate::core::metadata::{FileId, FileMetadata};
use crate::core::posting::PostingList;
use crate::core::table::FileTable;
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Key into one of the four attribute maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey<'a> {
    Extension(&'a str),
    Owner(&'a str),
    CreateTime(&'a str),
    Size(u64),
}

/// Inverted index statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Distinct extensions
    pub extension_keys: usize,
    /// Distinct owners
    pub owner_keys: usize,
    /// Distinct creation timestamps
    pub time_keys: usize,
    /// Distinct file sizes
    pub size_keys: usize,
    /// Identifiers stored across all posting lists
    pub postings: usize,
    /// Bytes used by posting-list storage
    pub memory_bytes: usize,
    /// Bytes the posting lists would take gap-encoded
    pub delta_encoded_bytes: usize,
}

#[derive(Debug, Default)]
struct IndexMaps {
    by_extension: AHashMap<String, PostingList>,
    by_owner: AHashMap<String, PostingList>,
    by_time: AHashMap<String, PostingList>,
    by_size: BTreeMap<u64, PostingList>,
}

impl IndexMaps {
    fn lists(&self) -> impl Iterator<Item = &PostingList> {
        self.by_extension
            .values()
            .chain(self.by_owner.values())
            .chain(self.by_time.values())
            .chain(self.by_size.values())
    }
}

/// Thread-safe inverted index over file attributes
#[derive(Debug, Default)]
pub struct InvertedIndex {
    maps: RwLock<IndexMaps>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex {
            maps: RwLock::new(IndexMaps::default()),
        }
    }

    /// Index a file under all four attributes
    pub fn add(&self, file: &FileMetadata) {
        let mut maps = self.maps.write();
        let id = file.file_id;

        insert_posting(&mut maps.by_extension, &file.extension, id);
        insert_posting(&mut maps.by_owner, &file.owner, id);
        insert_posting(&mut maps.by_time, &file.create_time, id);
        maps.by_size
            .entry(file.file_size)
            .or_insert_with(PostingList::new)
            .insert(id);
    }

    /// Remove a file from all four attributes, dropping emptied keys
    pub fn remove(&self, file: &FileMetadata) {
        let mut maps = self.maps.write();
        let id = file.file_id;

        remove_posting(&mut maps.by_extension, &file.extension, id);
        remove_posting(&mut maps.by_owner, &file.owner, id);
        remove_posting(&mut maps.by_time, &file.create_time, id);

        if let Some(list) = maps.by_size.get_mut(&file.file_size) {
            list.remove(id);
            if list.is_empty() {
                maps.by_size.remove(&file.file_size);
            }
        }
    }

    pub fn query_by_extension(&self, extension: &str) -> Vec<FileId> {
        let maps = self.maps.read();
        copy_ids(maps.by_extension.get(extension))
    }

    pub fn query_by_owner(&self, owner: &str) -> Vec<FileId> {
        let maps = self.maps.read();
        copy_ids(maps.by_owner.get(owner))
    }

    pub fn query_by_time(&self, create_time: &str) -> Vec<FileId> {
        let maps = self.maps.read();
        copy_ids(maps.by_time.get(create_time))
    }

    /// Files with `min_size <= size <= max_size`, in ascending identifier order
    ///
    /// An inverted range (`min_size > max_size`) yields nothing.
    pub fn query_by_size_range(&self, min_size: u64, max_size: u64) -> Vec<FileId> {
        if min_size > max_size {
            return Vec::new();
        }

        let maps = self.maps.read();
        let mut ids: Vec<FileId> = maps
            .by_size
            .range(min_size..=max_size)
            .flat_map(|(_, list)| list.iter())
            .collect();
        drop(maps);

        // Lists for different sizes interleave in identifier space
        ids.sort_unstable();
        ids.dedup();
        trace!("Size range [{}, {}] matched {} files", min_size, max_size, ids.len());
        ids
    }

    /// Whether a key is present in its attribute map
    pub fn contains_key(&self, key: IndexKey<'_>) -> bool {
        let maps = self.maps.read();
        match key {
            IndexKey::Extension(ext) => maps.by_extension.contains_key(ext),
            IndexKey::Owner(owner) => maps.by_owner.contains_key(owner),
            IndexKey::CreateTime(time) => maps.by_time.contains_key(time),
            IndexKey::Size(size) => maps.by_size.contains_key(&size),
        }
    }

    /// Bytes used by all posting lists
    pub fn memory_footprint(&self) -> usize {
        let maps = self.maps.read();
        maps.lists().map(PostingList::memory_usage).sum()
    }

    pub fn stats(&self) -> IndexStats {
        let maps = self.maps.read();
        let mut stats = IndexStats {
            extension_keys: maps.by_extension.len(),
            owner_keys: maps.by_owner.len(),
            time_keys: maps.by_time.len(),
            size_keys: maps.by_size.len(),
            ..IndexStats::default()
        };

        for list in maps.lists() {
            stats.postings += list.len();
            stats.memory_bytes += list.memory_usage();
            stats.delta_encoded_bytes += list.delta_encoded_len();
        }

        stats
    }

    /// Check the index against the file table
    ///
    /// Every posting list must be non-empty and strictly ascending, every
    /// identifier must resolve in `table` to a file whose attribute equals
    /// the list's key, and each attribute map must hold exactly one posting
    /// per table entry.
    pub fn verify_against(&self, table: &FileTable) -> Result<()> {
        let maps = self.maps.read();

        verify_map("extension", maps.by_extension.iter(), table, |file, key| {
            file.extension == *key
        })?;
        verify_map("owner", maps.by_owner.iter(), table, |file, key| {
            file.owner == *key
        })?;
        verify_map("create_time", maps.by_time.iter(), table, |file, key| {
            file.create_time == *key
        })?;
        verify_map("size", maps.by_size.iter(), table, |file, key| {
            file.file_size == *key
        })?;

        Ok(())
    }
}

fn insert_posting(map: &mut AHashMap<String, PostingList>, key: &str, id: FileId) {
    match map.get_mut(key) {
        Some(list) => {
            list.insert(id);
        }
        None => {
            map.insert(key.to_string(), PostingList::with_single(id));
        }
    }
}

fn remove_posting(map: &mut AHashMap<String, PostingList>, key: &str, id: FileId) {
    if let Some(list) = map.get_mut(key) {
        list.remove(id);
        if list.is_empty() {
            map.remove(key);
        }
    }
}

fn copy_ids(list: Option<&PostingList>) -> Vec<FileId> {
    list.map(|list| list.ids().to_vec()).unwrap_or_default()
}

fn verify_map<'a, K, I, F>(attribute: &str, entries: I, table: &FileTable, matches: F) -> Result<()>
where
    K: std::fmt::Debug + 'a,
    I: Iterator<Item = (&'a K, &'a PostingList)>,
    F: Fn(&FileMetadata, &K) -> bool,
{
    let mut postings = 0;

    for (key, list) in entries {
        if list.is_empty() {
            return Err(CatalogError::Inconsistent(format!(
                "{} index keeps empty posting list for {:?}",
                attribute, key
            )));
        }
        if !list.is_strictly_ascending() {
            return Err(CatalogError::Inconsistent(format!(
                "{} index posting list for {:?} is not strictly ascending",
                attribute, key
            )));
        }

        for id in list {
            let file = table.get(id).ok_or_else(|| {
                CatalogError::Inconsistent(format!(
                    "{} index references unknown file {} under {:?}",
                    attribute, id, key
                ))
            })?;
            if !matches(&**file, key) {
                return Err(CatalogError::Inconsistent(format!(
                    "file {} indexed under {} {:?} but carries a different value",
                    id, attribute, key
                )));
            }
        }

        postings += list.len();
    }

    if postings != table.len() {
        return Err(CatalogError::Inconsistent(format!(
            "{} index holds {} postings for {} files",
            attribute,
            postings,
            table.len()
        )));
    }

    Ok(())
}
