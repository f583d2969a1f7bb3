use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Concordance;
use crate::index::matrix::{DocVector, TfIdfMatrix};
use crate::index::posting::PostingList;
use crate::index::shard::{shard_index, Shard, SHARD_COUNT};
use crate::registry::{DocRegistry, VocabRegistry};

fn parse_term_id(term_id: &str) -> Result<usize> {
    let id: u64 = term_id
        .parse()
        .map_err(|_| Error::new(ErrorKind::InvalidId, format!("not a decimal term id: {term_id:?}")))?;
    Ok((id - 1) as usize)
}

/// The sharded inverted index: 32 concurrent shards, the doc/vocab
/// registries that dedupe and capacity-bound ingestion, and the TF-IDF
/// matrix rebuilt on each quiesce.
pub struct Index {
    shards: Vec<Shard>,
    doc_registry: DocRegistry,
    vocab_registry: VocabRegistry,
    doc_count: AtomicU64,
    vocab_count: AtomicU64,
    max_term_frequency: AtomicU64,
    available: AtomicBool,
    matrix: RwLock<Option<Arc<TfIdfMatrix>>>,
}

#[derive(Serialize, Deserialize)]
struct Metadata {
    doc_count: u64,
    vocab_count: u64,
    max_term_frequency: u64,
    doc_registry_words: Vec<u64>,
    vocab_registry_words: Vec<u64>,
}

impl Default for Index {
    fn default() -> Self {
        Index::new()
    }
}

impl Index {
    pub fn new() -> Self {
        Index {
            shards: (0..SHARD_COUNT).map(|_| Shard::new()).collect(),
            doc_registry: DocRegistry::new(),
            vocab_registry: VocabRegistry::new(),
            doc_count: AtomicU64::new(0),
            vocab_count: AtomicU64::new(0),
            max_term_frequency: AtomicU64::new(0),
            available: AtomicBool::new(false),
            matrix: RwLock::new(None),
        }
    }

    pub fn doc_count(&self) -> u64 {
        self.doc_count.load(Ordering::Relaxed)
    }

    pub fn vocab_count(&self) -> u64 {
        self.vocab_count.load(Ordering::Relaxed)
    }

    pub fn max_term_frequency(&self) -> u64 {
        self.max_term_frequency.load(Ordering::Relaxed)
    }

    pub fn mark_available(&self) {
        self.available.store(true, Ordering::Release);
    }

    pub fn mark_unavailable(&self) {
        self.available.store(false, Ordering::Release);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Allocates a new numeric term id and marks it in the vocab
    /// registry. Serialized implicitly: the shard write lock held by
    /// the caller's `upsert` ensures only one thread ever takes this
    /// path for a given term within a shard, and the registry itself
    /// is globally ordered by the `vocab_count` fetch-add.
    fn allocate_term_id(&self) -> Result<String> {
        let id = self.vocab_count.fetch_add(1, Ordering::Relaxed) + 1;
        let term_id = format!("{id:010}");
        self.vocab_registry.set(&term_id)?;
        Ok(term_id)
    }

    fn bump_max_term_frequency(&self, candidate: u64) {
        let mut current = self.max_term_frequency.load(Ordering::Relaxed);
        while candidate > current {
            match self.max_term_frequency.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Indexes one document's concordance. Fails with `AlreadyIndexed`
    /// if `doc_id` was ingested before, or `CapacityExceeded` if the doc
    /// or vocab registry is full. A capacity failure partway through a
    /// concordance leaves whichever shards were already updated in
    /// place — per-doc updates across shards are not atomic.
    pub fn ingest(&self, doc_id: &str, concordance: &Concordance) -> Result<()> {
        if self.doc_registry.exist(doc_id)? {
            return Err(Error::new(ErrorKind::AlreadyIndexed, format!("doc {doc_id:?} already indexed")));
        }
        self.doc_registry.set(doc_id)?;

        let doc_idx = self.doc_count.fetch_add(1, Ordering::Relaxed) + 1;

        let mut local_max = 0u64;
        for (term, freq) in concordance {
            let shard = &self.shards[shard_index(term)];
            shard.upsert(term, *freq, doc_idx, doc_id, || self.allocate_term_id())?;
            local_max = local_max.max(*freq);
        }
        self.bump_max_term_frequency(local_max);
        Ok(())
    }

    /// Rebuilds the dense TF-IDF matrix from every shard's postings.
    /// Replaces the published matrix atomically; in-flight `topk`
    /// calls keep their own `Arc` of the previous matrix.
    pub fn build_tfidf(&self) -> Result<()> {
        let doc_count = self.doc_count() as usize;
        let vocab_count = self.vocab_count() as usize;
        let mut rows: Vec<DocVector> = (0..doc_count).map(|_| DocVector::zeroed(vocab_count)).collect();

        for shard in &self.shards {
            for list in shard.read().values() {
                let col = parse_term_id(&list.term_id)?;
                if col >= vocab_count {
                    continue;
                }
                let idf = (doc_count as f32 / list.doc_frequency as f32).log2();
                for posting in &list.postings {
                    let row_idx = (posting.doc_idx - 1) as usize;
                    let Some(row) = rows.get_mut(row_idx) else { continue };
                    row.doc_id = posting.doc_id.clone();
                    row.values[col] = posting.term_frequency as f32 * idf;
                }
            }
        }

        *self.matrix.write() = Some(Arc::new(TfIdfMatrix::new(rows)));
        Ok(())
    }

    /// Builds a query vector with the double-normalized Salton weight
    /// `(0.5 + 0.5 * tf / max_tf) * log2(doc_count / doc_frequency)`.
    /// Terms absent from the vocabulary contribute zero.
    pub fn build_query_vector(&self, concordance: &Concordance) -> Vec<f32> {
        let vocab_count = self.vocab_count() as usize;
        let doc_count = self.doc_count() as f32;
        let max_tf = concordance.values().copied().max().unwrap_or(1).max(1) as f32;
        let mut vector = vec![0.0f32; vocab_count];

        for (term, freq) in concordance {
            let shard = &self.shards[shard_index(term)];
            let Some(list) = shard.get(term) else { continue };
            let Ok(col) = parse_term_id(&list.term_id) else { continue };
            if col >= vocab_count {
                continue;
            }
            let idf = (doc_count / list.doc_frequency as f32).log2();
            vector[col] = (0.5 + 0.5 * (*freq as f32) / max_tf) * idf;
        }
        vector
    }

    /// Ranks every indexed document against `query_vector` by cosine
    /// similarity and returns up to `k` doc ids, highest similarity
    /// first. Returns an empty result if `build_tfidf` has never run.
    pub fn topk(&self, k: usize, query_vector: &[f32]) -> Vec<String> {
        match self.matrix.read().as_ref() {
            Some(matrix) => crate::index::ranker::topk(matrix, query_vector, k),
            None => Vec::new(),
        }
    }

    fn write_atomically<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Persists `metadata.json` plus one `term-indexing-<n>.json` per
    /// shard to `dir`, each written to a temp file and renamed into
    /// place so a crash mid-snapshot never leaves a partial file.
    pub fn snapshot(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let metadata = Metadata {
            doc_count: self.doc_count(),
            vocab_count: self.vocab_count(),
            max_term_frequency: self.max_term_frequency(),
            doc_registry_words: self.doc_registry.snapshot_words(),
            vocab_registry_words: self.vocab_registry.snapshot_words(),
        };
        Self::write_atomically(&dir.join("metadata.json"), &metadata)?;

        for (i, shard) in self.shards.iter().enumerate() {
            let entries: HashMap<String, PostingList> = shard.read().clone();
            Self::write_atomically(&dir.join(format!("term-indexing-{i}.json")), &entries)?;
        }
        Ok(())
    }

    /// Rebuilds an `Index` from a snapshot directory written by
    /// `snapshot`. Any missing or unparsable file is `SnapshotCorrupt`.
    pub fn restore(dir: &Path) -> Result<Self> {
        let metadata_path = dir.join("metadata.json");
        let metadata_bytes = std::fs::read(&metadata_path)
            .map_err(|e| Error::new(ErrorKind::SnapshotCorrupt, format!("{metadata_path:?}: {e}")))?;
        let metadata: Metadata = serde_json::from_slice(&metadata_bytes)
            .map_err(|e| Error::new(ErrorKind::SnapshotCorrupt, format!("{metadata_path:?}: {e}")))?;

        let index = Index::new();
        index.doc_count.store(metadata.doc_count, Ordering::Relaxed);
        index.vocab_count.store(metadata.vocab_count, Ordering::Relaxed);
        index.max_term_frequency.store(metadata.max_term_frequency, Ordering::Relaxed);
        index.doc_registry.restore_words(metadata.doc_registry_words);
        index.vocab_registry.restore_words(metadata.vocab_registry_words);

        for (i, shard) in index.shards.iter().enumerate() {
            let path = dir.join(format!("term-indexing-{i}.json"));
            let bytes = std::fs::read(&path)
                .map_err(|e| Error::new(ErrorKind::SnapshotCorrupt, format!("{path:?}: {e}")))?;
            let entries: HashMap<String, PostingList> = serde_json::from_slice(&bytes)
                .map_err(|e| Error::new(ErrorKind::SnapshotCorrupt, format!("{path:?}: {e}")))?;
            shard.restore(entries);
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concordance(pairs: &[(&str, u64)]) -> Concordance {
        pairs.iter().map(|(t, f)| (t.to_string(), *f)).collect()
    }

    #[test]
    fn ingest_rejects_duplicate_doc_id() {
        let index = Index::new();
        index.ingest("1", &concordance(&[("alpha", 2)])).unwrap();
        let err = index.ingest("1", &concordance(&[("beta", 1)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyIndexed);
    }

    #[test]
    fn ingest_accepts_empty_concordance() {
        let index = Index::new();
        index.ingest("1", &concordance(&[])).unwrap();
        assert!(index.doc_registry.exist("1").unwrap());
        assert_eq!(index.doc_count(), 1);
    }

    #[test]
    fn ingest_rejects_doc_id_beyond_capacity() {
        let index = Index::new();
        let err = index.ingest("10001", &concordance(&[("alpha", 1)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
        assert_eq!(index.doc_count(), 0);
    }

    #[test]
    fn build_tfidf_and_topk_rank_matching_doc_first() {
        let index = Index::new();
        index.ingest("1", &concordance(&[("alpha", 5), ("beta", 1)])).unwrap();
        index.ingest("2", &concordance(&[("beta", 3)])).unwrap();
        index.build_tfidf().unwrap();

        let query = index.build_query_vector(&concordance(&[("alpha", 1)]));
        let results = index.topk(2, &query);
        assert_eq!(results.first().map(String::as_str), Some("1"));
    }

    #[test]
    fn max_term_frequency_tracks_the_highest_seen() {
        let index = Index::new();
        index.ingest("1", &concordance(&[("alpha", 5)])).unwrap();
        index.ingest("2", &concordance(&[("alpha", 2), ("beta", 9)])).unwrap();
        assert_eq!(index.max_term_frequency(), 9);
    }

    #[test]
    fn snapshot_restore_round_trip_preserves_ranking() {
        let index = Index::new();
        index.ingest("1", &concordance(&[("alpha", 5), ("beta", 1)])).unwrap();
        index.ingest("2", &concordance(&[("beta", 3)])).unwrap();
        index.build_tfidf().unwrap();

        let dir = tempfile::tempdir().unwrap();
        index.snapshot(dir.path()).unwrap();

        let restored = Index::restore(dir.path()).unwrap();
        assert_eq!(restored.doc_count(), 2);
        assert_eq!(restored.vocab_count(), 2);
        let err = restored.ingest("1", &concordance(&[("gamma", 1)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyIndexed);

        restored.build_tfidf().unwrap();
        let query = restored.build_query_vector(&concordance(&[("alpha", 1)]));
        let results = restored.topk(2, &query);
        assert_eq!(results.first().map(String::as_str), Some("1"));
    }
}
