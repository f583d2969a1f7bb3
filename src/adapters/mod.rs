//! External collaborators the pipeline driver depends on: the blob
//! store, the title lookup, and the message-bus ingress. The core spec
//! treats these as "only their interfaces matter" — each is a small
//! trait with an in-process fake implementation standing in for the
//! real MinIO/MySQL/Kafka integrations.

pub mod blob;
pub mod ingress;
pub mod title;

pub use blob::{BlobStore, LocalBlobStore};
pub use ingress::{FakeIngress, Ingress};
pub use title::{InMemoryTitleStore, TitleStore};
