use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocType, RawDocument};

/// The object-storage collaborator, collapsed to the two operations the
/// pipeline actually calls: fetch a raw document's body lines, and
/// stash the parsed text back out. Mirrors the upstream `Readable`/
/// `Get`/`Writable`/`Put` shape of its `Persister` interface.
pub trait BlobStore: Send + Sync {
    fn get(&self, doc_id: &str, doc_type: DocType) -> Result<RawDocument>;
    fn put(&self, doc_id: &str, body: &[String]) -> Result<()>;
}

fn file_name(doc_id: &str, doc_type: DocType) -> String {
    let suffix = match doc_type {
        DocType::HtmlDoc => "html",
        DocType::TextDoc => "txt",
    };
    format!("{doc_id}.{suffix}")
}

/// A local-directory staging area standing in for the real MinIO
/// bucket: every document is a flat file under `root`, one line per
/// body line, matching the upstream `LocalStorage` implementation's
/// on-disk shape.
pub struct LocalBlobStore {
    root: PathBuf,
    // Guards directory creation so concurrent ingest tasks never race
    // `create_dir_all` against each other.
    init: Mutex<()>,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalBlobStore { root: root.into(), init: Mutex::new(()) }
    }

    fn ensure_root(&self) -> Result<()> {
        let _guard = self.init.lock().unwrap();
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn path_for(&self, doc_id: &str, doc_type: DocType) -> PathBuf {
        self.root.join(file_name(doc_id, doc_type))
    }

    /// Seeds a document directly onto disk, bypassing `put`; used by
    /// tests and the CLI demo to stage fixture documents.
    pub fn seed(&self, doc_id: &str, doc_type: DocType, body: &[&str]) -> Result<()> {
        self.ensure_root()?;
        let path = self.path_for(doc_id, doc_type);
        std::fs::write(path, body.join("\n"))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for LocalBlobStore {
    fn get(&self, doc_id: &str, doc_type: DocType) -> Result<RawDocument> {
        let path = self.path_for(doc_id, doc_type);
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::new(ErrorKind::BlobIoError, format!("{path:?}: {e}")))?;
        let body = contents.lines().map(str::to_string).collect();
        Ok(RawDocument { doc_id: doc_id.to_string(), doc_type, body })
    }

    fn put(&self, doc_id: &str, body: &[String]) -> Result<()> {
        self.ensure_root()?;
        let path = self.path_for(doc_id, DocType::TextDoc);
        std::fs::write(&path, body.join("\n"))
            .map_err(|e| Error::new(ErrorKind::BlobIoError, format!("{path:?}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_then_get_round_trips_body_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store.seed("1", DocType::HtmlDoc, &["<p>hello</p>", "<p>world</p>"]).unwrap();

        let doc = store.get("1", DocType::HtmlDoc).unwrap();
        assert_eq!(doc.body, vec!["<p>hello</p>".to_string(), "<p>world</p>".to_string()]);
    }

    #[test]
    fn get_missing_file_is_blob_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        let err = store.get("missing", DocType::TextDoc).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BlobIoError);
    }

    #[test]
    fn put_then_get_text_doc_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store.put("2", &["hello world".to_string()]).unwrap();

        let doc = store.get("2", DocType::TextDoc).unwrap();
        assert_eq!(doc.body, vec!["hello world".to_string()]);
    }
}
