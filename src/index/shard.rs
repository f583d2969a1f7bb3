use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::core::error::Result;
use crate::index::posting::{Posting, PostingList};

pub const SHARD_COUNT: u32 = 32;

/// FNV-1a, a stable 32-bit hash over the term's UTF-8 bytes. Persisted
/// data is shard-independent (each shard's contents are keyed by the
/// term string itself), so this may be swapped across versions.
pub fn hash32(term: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c9dc5;
    const PRIME: u32 = 0x01000193;
    term.bytes().fold(OFFSET_BASIS, |hash, byte| (hash ^ byte as u32).wrapping_mul(PRIME))
}

pub fn shard_index(term: &str) -> usize {
    (hash32(term) & 0x1f) as usize
}

/// One partition of the inverted index: a guarded `term -> PostingList`
/// map behind a single reader-writer lock.
#[derive(Default)]
pub struct Shard {
    backend: RwLock<HashMap<String, PostingList>>,
}

impl Shard {
    pub fn new() -> Self {
        Shard::default()
    }

    /// If `term` is absent, allocates a new term id via `on_new_term`
    /// (which the caller must serialize, e.g. with an atomic fetch-add,
    /// and which may fail with `CapacityExceeded`) and inserts a fresh
    /// posting list. If present, splices the posting into the existing
    /// list's ordered sequence.
    pub fn upsert(
        &self,
        term: &str,
        term_frequency: u64,
        doc_idx: u64,
        doc_id: &str,
        on_new_term: impl FnOnce() -> Result<String>,
    ) -> Result<()> {
        let posting = Posting { term_frequency, doc_idx, doc_id: doc_id.to_string() };
        let mut backend = self.backend.write();
        match backend.get_mut(term) {
            Some(list) => list.insert(posting),
            None => {
                let term_id = on_new_term()?;
                backend.insert(term.to_string(), PostingList::new(term_id, posting));
            }
        }
        Ok(())
    }

    pub fn get(&self, term: &str) -> Option<PostingList> {
        self.backend.read().get(term).cloned()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.backend.read().contains_key(term)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PostingList>> {
        self.backend.read()
    }

    pub fn term_count(&self) -> usize {
        self.backend.read().len()
    }

    pub fn restore(&self, entries: HashMap<String, PostingList>) {
        *self.backend.write() = entries;
    }
}
