use std::sync::Arc;
use std::time::{Duration, Instant};

use vsearch::adapters::blob::LocalBlobStore;
use vsearch::adapters::ingress::{FakeIngress, Ingress};
use vsearch::adapters::title::InMemoryTitleStore;
use vsearch::core::config::ServiceConfig;
use vsearch::core::types::{DocType, Language};
use vsearch::pipeline::Driver;
use vsearch::query::QueryService;

/// Smoke-test harness: runs the pipeline driver against a fixed batch
/// of fake documents staged on local disk, then issues a couple of
/// queries and prints the result. The real Kafka/MinIO/MySQL/RPC
/// surfaces are out of scope; this exercises the indexing/ranking core
/// end to end through the same driver a production binary would use.
#[tokio::main]
async fn main() {
    env_logger::init();
    log::info!("indexer-cli starting");

    let mut config = ServiceConfig::default();
    let staging = std::env::temp_dir().join(format!("vsearch-cli-{}", std::process::id()));
    config.pipeline.indexer.dump_path = staging.join("index-dump").to_string_lossy().to_string();

    let blob_dir = staging.join("blobs");
    let blob = Arc::new(LocalBlobStore::new(&blob_dir));
    seed_corpus(&blob);

    let titles = Arc::new(InMemoryTitleStore::seeded([
        ("1".to_string(), "The Quick Fox".to_string()),
        ("2".to_string(), "A Sleepy Dog".to_string()),
        ("3".to_string(), "Foxes and Dogs Together".to_string()),
    ]));

    let driver = Driver::bootstrap(&config.pipeline.indexer, blob, Language::English)
        .expect("bootstrap pipeline driver");
    let index = driver.index();

    let ingress = FakeIngress::batch_of([
        ("1", DocType::TextDoc),
        ("2", DocType::TextDoc),
        ("3", DocType::TextDoc),
    ]);
    driver.run(ingress.events()).await.expect("run pipeline to quiesce");

    let service = QueryService::new(index, titles, Language::English);
    let info = service.system_info();
    log::info!(
        "system info: doc_count={}/{} vocab_count={}/{} status={:?}",
        info.doc_count,
        info.doc_capacity,
        info.vocab_count,
        info.vocab_capacity,
        info.service_status
    );

    let deadline = Instant::now() + Duration::from_secs(2);
    match service.query(2, "fox", deadline).await {
        Ok(titles) => println!("query 'fox' -> {titles:?}"),
        Err(err) => log::error!("query failed: {err}"),
    }

    driver.shutdown().await.expect("shutdown pipeline driver");
    let _ = std::fs::remove_dir_all(&staging);
    log::info!("indexer-cli done");
}

fn seed_corpus(blob: &LocalBlobStore) {
    blob.seed("1", DocType::TextDoc, &["The quick fox jumps over the lazy dog."]).unwrap();
    blob.seed("2", DocType::TextDoc, &["A sleepy dog naps all afternoon."]).unwrap();
    blob.seed("3", DocType::TextDoc, &["Foxes and dogs rarely share the same den."]).unwrap();
}
