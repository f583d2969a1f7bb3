use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Index not yet Available (warming up or mid-rebuild).
    ServiceUnavailable,
    /// Caller's query deadline elapsed mid-pipeline.
    DeadlineExceeded,
    /// Empty query or k == 0.
    InvalidArgument,
    /// Duplicate doc id at ingest.
    AlreadyIndexed,
    /// Doc or vocab id beyond configured capacity.
    CapacityExceeded,
    /// An id string did not parse as a decimal integer.
    InvalidId,
    /// Restore could not parse or find a snapshot file.
    SnapshotCorrupt,
    /// Transient blob-store I/O failure, surfaced after retries are exhausted.
    BlobIoError,
    /// Transient title-lookup failure, surfaced after retries are exhausted.
    TitleLookupError,
    /// An index invariant was violated; the offending document is dropped.
    IngestInternal,
    /// Config/file loading failure.
    Io,
    /// JSON (de)serialization failure.
    Parse,
    /// Generic not-found condition.
    NotFound,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Parse, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
