use std::collections::HashMap;

/// A document's term-frequency mapping after tokenization, stop-word
/// removal, and stemming.
pub type Concordance = HashMap<String, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    HtmlDoc,
    TextDoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    SimplifiedChinese,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    InDelivery,
    OutOfStock,
}

/// A raw document as it arrives from the blob store, before parsing.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub doc_id: String,
    pub doc_type: DocType,
    pub body: Vec<String>,
}

/// One ingestion event off the message bus, bit-exact with the upstream
/// wire packet fields.
#[derive(Debug, Clone)]
pub struct IngestEvent {
    pub doc_type: DocType,
    pub doc_id: String,
    pub delivery_status: DeliveryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Copy)]
pub struct SystemInfo {
    pub doc_capacity: usize,
    pub doc_count: u64,
    pub vocab_capacity: usize,
    pub vocab_count: u64,
    pub service_status: ServiceStatus,
}
