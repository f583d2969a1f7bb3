use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub http_endpoint: String,
    pub grpc_endpoint: String,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub kafka: KafkaConfig,
    pub minio: MinioConfig,
    pub mysql: MySQLConfig,
    pub indexer: IndexerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: Vec<String>,
    pub version: String,
    pub consume_group: String,
    pub from_oldest: bool,
    /// Populated from `KAFKA_USERNAME` at load time; never serialized from file.
    #[serde(skip_serializing, default)]
    pub username: Option<String>,
    /// Populated from `KAFKA_PASSWORD` at load time; never serialized from file.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub use_ssl: bool,
    pub bucket: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySQLConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub dump_path: String,
    #[serde(default)]
    pub load: bool,
}

impl ServiceConfig {
    /// Load a JSON config file and overlay Kafka SASL credentials from the
    /// environment, matching the upstream service's `KAFKA_USERNAME`/
    /// `KAFKA_PASSWORD` convention.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mut cfg: ServiceConfig = serde_json::from_reader(BufReader::new(file))?;
        cfg.pipeline.kafka.username = std::env::var("KAFKA_USERNAME").ok();
        cfg.pipeline.kafka.password = std::env::var("KAFKA_PASSWORD").ok();
        Ok(cfg)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            http_endpoint: "0.0.0.0:8080".to_string(),
            grpc_endpoint: "0.0.0.0:9090".to_string(),
            pipeline: PipelineConfig {
                kafka: KafkaConfig {
                    brokers: vec!["localhost:9092".to_string()],
                    topic: vec!["documents".to_string()],
                    version: "2.8.0".to_string(),
                    consume_group: "vsearch-indexer".to_string(),
                    from_oldest: true,
                    username: std::env::var("KAFKA_USERNAME").ok(),
                    password: std::env::var("KAFKA_PASSWORD").ok(),
                },
                minio: MinioConfig {
                    endpoint: "localhost:9000".to_string(),
                    access_key: String::new(),
                    secret_key: String::new(),
                    use_ssl: false,
                    bucket: "documents".to_string(),
                    root: "/".to_string(),
                },
                mysql: MySQLConfig {
                    host: "localhost".to_string(),
                    port: 3306,
                    user: "root".to_string(),
                    password: String::new(),
                    db: "titles".to_string(),
                },
                indexer: IndexerConfig {
                    dump_path: "./data/index".to_string(),
                    load: false,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_overlays_kafka_credentials_from_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut default_cfg = ServiceConfig::default();
        default_cfg.pipeline.kafka.username = None;
        default_cfg.pipeline.kafka.password = None;
        write!(file, "{}", serde_json::to_string(&default_cfg).unwrap()).unwrap();

        unsafe {
            std::env::set_var("KAFKA_USERNAME", "alice");
            std::env::set_var("KAFKA_PASSWORD", "secret");
        }
        let cfg = ServiceConfig::load(file.path()).unwrap();
        unsafe {
            std::env::remove_var("KAFKA_USERNAME");
            std::env::remove_var("KAFKA_PASSWORD");
        }

        assert_eq!(cfg.pipeline.kafka.username.as_deref(), Some("alice"));
        assert_eq!(cfg.pipeline.kafka.password.as_deref(), Some("secret"));
    }
}
