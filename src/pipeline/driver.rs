use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::adapters::blob::BlobStore;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::stemmer::{IdentityFilter, StemmerFilter};
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::backoff::{retry_with_backoff, BackoffPolicy};
use crate::core::config::IndexerConfig;
use crate::core::error::Result;
use crate::core::types::{DeliveryStatus, IngestEvent, Language, RawDocument};
use crate::index::Index;
use crate::pipeline::gate::{AdmissionGate, ADMISSION_TOKENS};
use crate::pipeline::stages;

#[cfg(feature = "tokenizer-jieba")]
use crate::analysis::tokenizer::ChineseTokenizer;

/// Bounded queue depth shared by every stage channel in the pipeline.
pub const STAGE_DEPTH: usize = 20;

fn tokenizer_for(language: Language) -> Arc<dyn Tokenizer> {
    match language {
        Language::English => Arc::new(StandardTokenizer),
        #[cfg(feature = "tokenizer-jieba")]
        Language::SimplifiedChinese => Arc::new(ChineseTokenizer::new()),
        #[cfg(not(feature = "tokenizer-jieba"))]
        Language::SimplifiedChinese => Arc::new(StandardTokenizer),
    }
}

fn stopword_filter_for(language: Language) -> Arc<dyn TokenFilter> {
    match language {
        Language::English => Arc::new(StopWordFilter::english()),
        Language::SimplifiedChinese => Arc::new(StopWordFilter::simplified_chinese()),
    }
}

fn stemmer_filter_for(language: Language) -> Arc<dyn TokenFilter> {
    match language {
        Language::English => Arc::new(StemmerFilter::english()),
        // Simplified Chinese word segments are already index-ready.
        Language::SimplifiedChinese => Arc::new(IdentityFilter),
    }
}

/// Orchestrates the five streaming stages connected by bounded queues,
/// manages their lifecycle, and flips the index's Available flag around
/// rebuilds. Owns the `parser` stage's input channel: closing it is
/// what propagates shutdown downstream through every later stage.
pub struct Driver {
    index: Arc<Index>,
    blob: Arc<dyn BlobStore>,
    dump_path: PathBuf,
    parser_tx: Option<Sender<RawDocument>>,
    stage_handles: Vec<JoinHandle<()>>,
    /// Count of documents handed to the parser stage that have not yet
    /// settled in the indexer. `OutOfStock` waits for this to reach
    /// zero — the pipeline's quiesce condition — before rebuilding.
    in_flight: watch::Sender<u64>,
}

impl Driver {
    /// Restores a snapshot from `indexer_cfg.dump_path` if one exists
    /// and `load` is set, otherwise starts a fresh `Index`, then wires
    /// up the five pipeline stages for `language`.
    pub fn bootstrap(indexer_cfg: &IndexerConfig, blob: Arc<dyn BlobStore>, language: Language) -> Result<Self> {
        let dump_path = PathBuf::from(&indexer_cfg.dump_path);
        let index = if indexer_cfg.load && dump_path.join("metadata.json").exists() {
            log::info!("restoring index snapshot from {dump_path:?}");
            let restored = Index::restore(&dump_path)?;
            restored.build_tfidf()?;
            restored.mark_available();
            Arc::new(restored)
        } else {
            Arc::new(Index::new())
        };

        let gate = AdmissionGate::new(ADMISSION_TOKENS);
        let tokenizer = tokenizer_for(language);
        let stopword = stopword_filter_for(language);
        let stemmer = stemmer_filter_for(language);

        let (parser_tx, parser_rx) = mpsc::channel(STAGE_DEPTH);
        let (tok_tx, tok_rx) = mpsc::channel(STAGE_DEPTH);
        let (stop_tx, stop_rx) = mpsc::channel(STAGE_DEPTH);
        let (stem_tx, stem_rx) = mpsc::channel(STAGE_DEPTH);
        let (index_tx, index_rx) = mpsc::channel(STAGE_DEPTH);
        let (in_flight, _) = watch::channel(0u64);

        let stage_handles = vec![
            tokio::spawn(stages::parser_stage(parser_rx, tok_tx)),
            tokio::spawn(stages::tokenizer_stage(tok_rx, stop_tx, tokenizer)),
            tokio::spawn(stages::filter_stage(stop_rx, stem_tx, stopword)),
            tokio::spawn(stages::stemmer_stage(stem_rx, index_tx, stemmer)),
            tokio::spawn(stages::indexer_stage(index_rx, Arc::clone(&index), gate, in_flight.clone())),
        ];

        Ok(Driver { index, blob, dump_path, parser_tx: Some(parser_tx), stage_handles, in_flight })
    }

    pub fn index(&self) -> Arc<Index> {
        Arc::clone(&self.index)
    }

    /// Consumes ingress events until the channel closes. Each
    /// `InDelivery` event marks the index Unavailable and fetches the
    /// raw document (retried with backoff) before handing it to the
    /// parser stage; `OutOfStock` rebuilds the TF-IDF matrix and flips
    /// the index back to Available.
    pub async fn run(&self, mut events: Receiver<IngestEvent>) -> Result<()> {
        let Some(parser_tx) = self.parser_tx.clone() else {
            return Ok(());
        };
        while let Some(event) = events.recv().await {
            match event.delivery_status {
                DeliveryStatus::InDelivery => {
                    self.index.mark_unavailable();
                    let doc_id = event.doc_id.clone();
                    let doc_type = event.doc_type;
                    let blob = Arc::clone(&self.blob);
                    let fetch = retry_with_backoff(BackoffPolicy::default(), || {
                        let blob = Arc::clone(&blob);
                        let doc_id = doc_id.clone();
                        async move { blob.get(&doc_id, doc_type) }
                    })
                    .await;
                    match fetch {
                        Ok(raw) => {
                            self.in_flight.send_modify(|n| *n += 1);
                            if parser_tx.send(raw).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => log::error!("blob fetch failed for doc {doc_id}: {err}"),
                    }
                }
                DeliveryStatus::OutOfStock => {
                    self.wait_quiesced().await;
                    self.index.build_tfidf()?;
                    self.index.mark_available();
                    log::info!("quiesce reached, index marked available");
                }
            }
        }
        Ok(())
    }

    /// Blocks until every document handed to the parser stage has
    /// settled in the indexer: the glossary's "no ingest task in flight"
    /// quiesce condition.
    async fn wait_quiesced(&self) {
        let mut rx = self.in_flight.subscribe();
        while *rx.borrow() != 0 {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// Closes the parser input, waits for every stage worker to drain,
    /// then snapshots the index. Never force-kills in-flight ingest
    /// tasks — they finish on their own once their shard writes land.
    pub async fn shutdown(mut self) -> Result<()> {
        self.parser_tx.take();
        for handle in self.stage_handles.drain(..) {
            let _ = handle.await;
        }
        self.index.snapshot(&self.dump_path)?;
        Ok(())
    }
}
