//! Posting lists for the inverted index
//!
//! A posting list holds the identifiers of every file matching one index key.
//! Identifiers are kept in a dense, strictly ascending `Vec`:
//! - Insert/remove: binary search for the slot, then an O(n) shift
//! - Membership: O(log n)
//! - Iteration: in identifier order, cache friendly
//!
//! Because catalog identifiers are dense and ascending, the gaps between
//! neighbours are small. [`PostingList::delta_encoded_len`] reports what the
//! list would occupy under gap + varint encoding.

use crate::core::metadata::FileId;
use std::mem;

/// Sorted, duplicate-free list of file identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    ids: Vec<FileId>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList { ids: Vec::new() }
    }

    /// Create a list holding a single identifier
    pub fn with_single(id: FileId) -> Self {
        PostingList { ids: vec![id] }
    }

    /// Insert an identifier, keeping the list sorted
    ///
    /// Returns `false` if the identifier was already present.
    pub fn insert(&mut self, id: FileId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.ids.insert(pos, id);
                true
            }
        }
    }

    /// Remove an identifier
    ///
    /// Returns `false` if the identifier was not present.
    pub fn remove(&mut self, id: FileId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(pos) => {
                self.ids.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// In-order view of the identifiers
    pub fn ids(&self) -> &[FileId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = FileId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Bytes used by the stored identifiers
    pub fn memory_usage(&self) -> usize {
        self.ids.len() * mem::size_of::<FileId>()
    }

    /// Bytes the list would take as LEB128-encoded gaps
    ///
    /// The first identifier is encoded as-is, every following one as the
    /// difference to its predecessor.
    pub fn delta_encoded_len(&self) -> usize {
        let mut previous = 0u64;
        self.ids
            .iter()
            .map(|id| {
                let gap = id.get() - previous;
                previous = id.get();
                varint_len(gap)
            })
            .sum()
    }

    /// Whether every identifier is strictly greater than its predecessor
    pub fn is_strictly_ascending(&self) -> bool {
        self.ids.windows(2).all(|pair| pair[0] < pair[1])
    }
}

impl FromIterator<FileId> for PostingList {
    fn from_iter<I: IntoIterator<Item = FileId>>(iter: I) -> Self {
        let mut ids: Vec<FileId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        PostingList { ids }
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = FileId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, FileId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

/// Length of `value` as an unsigned LEB128 varint
fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}
