//! The streaming ingest pipeline: parse -> tokenize -> stop-word
//! removal -> stem -> index, connected by bounded queues, gated at the
//! indexer stage by the admission semaphore, and orchestrated by the
//! `Driver`.

pub mod driver;
pub mod gate;
pub mod stages;

pub use driver::{Driver, STAGE_DEPTH};
pub use gate::{AdmissionGate, ADMISSION_TOKENS};
