use std::sync::Arc;

use regex::Regex;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::Tokenizer;
use crate::core::types::{Concordance, DocType, RawDocument};
use crate::index::Index;
use crate::pipeline::gate::AdmissionGate;

/// A document after the parse stage has stripped markup and joined its
/// body into one text blob.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    pub doc_id: String,
    pub text: String,
}

/// A document mid-pipeline, carrying whatever token list the current
/// stage produced; reused across tokenize, stop-word, and stem.
#[derive(Debug, Clone)]
pub struct TokenizedDoc {
    pub doc_id: String,
    pub tokens: Vec<Token>,
}

/// A document ready for indexing: its final term-frequency map.
#[derive(Debug, Clone)]
pub struct ConcordanceMsg {
    pub doc_id: String,
    pub concordance: Concordance,
}

/// Strips `<tag ...>` markup down to its text content. A minimal pass,
/// not a full HTML parser: it does not understand entities, scripts,
/// or malformed markup, which is adequate for the corpus this indexer
/// serves (HTML-to-text extraction proper is an external collaborator).
pub fn strip_html(html: &str) -> String {
    static TAG: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    tag.replace_all(html, "").into_owned()
}

/// Stage 1: parse. Strips HTML for `DocType::HtmlDoc`, passes
/// `DocType::TextDoc` through unchanged, and joins body lines into one
/// text blob for the tokenizer stage. Closes `output` once `input`
/// closes, per the stage worker contract.
pub async fn parser_stage(mut input: Receiver<RawDocument>, output: Sender<ParsedDoc>) {
    while let Some(doc) = input.recv().await {
        let joined = doc.body.join("\n");
        let text = match doc.doc_type {
            DocType::HtmlDoc => strip_html(&joined),
            DocType::TextDoc => joined,
        };
        if output.send(ParsedDoc { doc_id: doc.doc_id, text }).await.is_err() {
            break;
        }
    }
}

/// Stage 2: tokenize. Language-dispatched via the `Tokenizer` trait
/// object the driver configured for this pipeline.
pub async fn tokenizer_stage(
    mut input: Receiver<ParsedDoc>,
    output: Sender<TokenizedDoc>,
    tokenizer: Arc<dyn Tokenizer>,
) {
    while let Some(doc) = input.recv().await {
        let tokens = tokenizer.tokenize(&doc.text);
        if output.send(TokenizedDoc { doc_id: doc.doc_id, tokens }).await.is_err() {
            break;
        }
    }
}

/// Stage 3: stop-word removal. Shares the `TokenFilter` trait with the
/// stemmer stage; only the filter instance differs.
pub async fn filter_stage(
    mut input: Receiver<TokenizedDoc>,
    output: Sender<TokenizedDoc>,
    filter: Arc<dyn TokenFilter>,
) {
    while let Some(doc) = input.recv().await {
        let tokens = filter.filter(doc.tokens);
        if output.send(TokenizedDoc { doc_id: doc.doc_id, tokens }).await.is_err() {
            break;
        }
    }
}

/// Stage 4: stem, folding the surviving tokens into a concordance for
/// the indexer stage.
pub async fn stemmer_stage(
    mut input: Receiver<TokenizedDoc>,
    output: Sender<ConcordanceMsg>,
    filter: Arc<dyn TokenFilter>,
) {
    while let Some(doc) = input.recv().await {
        let tokens = filter.filter(doc.tokens);
        let mut concordance = Concordance::new();
        for token in tokens {
            if token.text.is_empty() {
                continue;
            }
            *concordance.entry(token.text).or_insert(0) += 1;
        }
        if output.send(ConcordanceMsg { doc_id: doc.doc_id, concordance }).await.is_err() {
            break;
        }
    }
}

/// Stage 5: index. Gated by the admission semaphore — one token per
/// in-flight `Index::ingest` call, released on every exit path
/// (success, `AlreadyIndexed`, or `CapacityExceeded`) since the permit
/// is held by the spawned task's stack frame. Decrements `in_flight`
/// once the document's ingest has settled, so the driver can tell when
/// the pipeline has quiesced.
pub async fn indexer_stage(
    mut input: Receiver<ConcordanceMsg>,
    index: Arc<Index>,
    gate: Arc<AdmissionGate>,
    in_flight: watch::Sender<u64>,
) {
    let mut workers = Vec::new();
    while let Some(msg) = input.recv().await {
        let index = Arc::clone(&index);
        let gate = Arc::clone(&gate);
        let in_flight = in_flight.clone();
        workers.push(tokio::spawn(async move {
            let _permit = gate.acquire().await;
            match index.ingest(&msg.doc_id, &msg.concordance) {
                Ok(()) => log::debug!("indexed doc {}", msg.doc_id),
                Err(err) => match err.kind {
                    crate::core::error::ErrorKind::AlreadyIndexed => {
                        log::info!("doc {} already indexed, skipping", msg.doc_id);
                    }
                    crate::core::error::ErrorKind::CapacityExceeded => {
                        log::warn!("doc {} dropped: {}", msg.doc_id, err);
                    }
                    _ => log::error!("doc {} dropped: {}", msg.doc_id, err),
                },
            }
            in_flight.send_modify(|n| *n = n.saturating_sub(1));
        }));
    }
    for worker in workers {
        let _ = worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_drops_tags_keeps_text() {
        assert_eq!(strip_html("<p>hello <b>world</b></p>"), "hello world");
    }

    #[tokio::test]
    async fn parser_stage_joins_body_and_strips_html() {
        let (in_tx, in_rx) = tokio::sync::mpsc::channel(4);
        let (out_tx, mut out_rx) = tokio::sync::mpsc::channel(4);
        tokio::spawn(parser_stage(in_rx, out_tx));

        in_tx
            .send(RawDocument {
                doc_id: "1".into(),
                doc_type: DocType::HtmlDoc,
                body: vec!["<p>hello</p>".into(), "<p>world</p>".into()],
            })
            .await
            .unwrap();
        drop(in_tx);

        let parsed = out_rx.recv().await.unwrap();
        assert_eq!(parsed.text, "hello\nworld");
        assert!(out_rx.recv().await.is_none());
    }
}
