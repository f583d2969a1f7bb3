//! The synchronous query path: tokenize/stop/stem the free-text
//! question with the same transforms used at ingest, rank by cosine
//! similarity, and resolve doc ids to titles.

use std::sync::Arc;
use std::time::Instant;

use crate::adapters::title::TitleStore;
use crate::analysis::Analyzer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Language, ServiceStatus, SystemInfo};
use crate::index::Index;
use crate::registry::{DOC_CAPACITY, VOCAB_CAPACITY};

/// The query-facing read surface: reuses the ingest-side tokenizer and
/// filter chain in single-shot synchronous mode and dispatches into the
/// index's cosine ranker.
pub struct QueryService {
    index: Arc<Index>,
    titles: Arc<dyn TitleStore>,
    analyzer: Analyzer,
}

impl QueryService {
    pub fn new(index: Arc<Index>, titles: Arc<dyn TitleStore>, language: Language) -> Self {
        QueryService { index, titles, analyzer: Analyzer::for_language(language) }
    }

    /// Runs `Query(k, text)`: tokenizes `text`, builds a query vector,
    /// ranks the top `k` documents, and resolves their titles. Checks
    /// `deadline` after each pipeline stage, matching the source's
    /// "does not interrupt `topk` mid-scan" cancellation policy.
    pub async fn query(&self, k: u32, text: &str, deadline: Instant) -> Result<Vec<String>> {
        if !self.index.is_available() {
            return Err(Error::new(ErrorKind::ServiceUnavailable, "index is not yet available"));
        }
        if k == 0 || text.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "k must be >= 1 and query must be non-empty"));
        }
        self.check_deadline(deadline)?;

        let concordance = self.analyzer.analyze(text);
        self.check_deadline(deadline)?;

        let query_vector = self.index.build_query_vector(&concordance);
        self.check_deadline(deadline)?;

        let ids = self.index.topk(k as usize, &query_vector);
        let titles = ids.iter().map(|id| self.titles.get(id).unwrap_or_default()).collect();
        Ok(titles)
    }

    fn check_deadline(&self, deadline: Instant) -> Result<()> {
        if Instant::now() >= deadline {
            return Err(Error::new(ErrorKind::DeadlineExceeded, "query deadline elapsed"));
        }
        Ok(())
    }

    /// `GetSystemInfo`: capacities are compile-time constants, the
    /// counts are read from the live index.
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            doc_capacity: DOC_CAPACITY as usize,
            doc_count: self.index.doc_count(),
            vocab_capacity: VOCAB_CAPACITY as usize,
            vocab_count: self.index.vocab_count(),
            service_status: if self.index.is_available() { ServiceStatus::Available } else { ServiceStatus::Unavailable },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::title::InMemoryTitleStore;
    use std::time::Duration;

    fn concordance(pairs: &[(&str, u64)]) -> crate::core::types::Concordance {
        pairs.iter().map(|(t, f)| (t.to_string(), *f)).collect()
    }

    #[tokio::test]
    async fn query_fails_unavailable_before_build_tfidf() {
        let index = Arc::new(Index::new());
        index.ingest("1", &concordance(&[("fox", 2)])).unwrap();
        let service = QueryService::new(index, Arc::new(InMemoryTitleStore::new()), Language::English);

        let err = service.query(1, "fox", Instant::now() + Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn query_rejects_empty_text_and_zero_k() {
        let index = Arc::new(Index::new());
        index.mark_available();
        let service = QueryService::new(index, Arc::new(InMemoryTitleStore::new()), Language::English);

        let deadline = Instant::now() + Duration::from_secs(1);
        assert_eq!(service.query(0, "fox", deadline).await.unwrap_err().kind, ErrorKind::InvalidArgument);
        assert_eq!(service.query(1, "   ", deadline).await.unwrap_err().kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn query_resolves_titles_for_top_match() {
        let index = Arc::new(Index::new());
        index.ingest("1", &concordance(&[("fox", 5), ("dog", 1)])).unwrap();
        index.ingest("2", &concordance(&[("dog", 3)])).unwrap();
        index.build_tfidf().unwrap();
        index.mark_available();

        let titles = Arc::new(InMemoryTitleStore::new());
        titles.set("1", "About Foxes");
        titles.set("2", "About Dogs");
        let service = QueryService::new(index, titles, Language::English);

        let results = service.query(1, "fox", Instant::now() + Duration::from_secs(1)).await.unwrap();
        assert_eq!(results, vec!["About Foxes".to_string()]);
    }

    #[tokio::test]
    async fn query_fails_deadline_exceeded() {
        let index = Arc::new(Index::new());
        index.ingest("1", &concordance(&[("fox", 2)])).unwrap();
        index.build_tfidf().unwrap();
        index.mark_available();
        let service = QueryService::new(index, Arc::new(InMemoryTitleStore::new()), Language::English);

        let err = service.query(1, "fox", Instant::now()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DeadlineExceeded);
    }
}
