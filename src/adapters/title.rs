use std::collections::HashMap;

use parking_lot::RwLock;

/// The relational doc-id -> title lookup used to render query results.
/// Mirrors the upstream MySQL `Query(doc_id) -> title` shape; unknown
/// ids resolve to `None` rather than an error, matching `Doc{}.Title`
/// defaulting to the empty string on a miss.
pub trait TitleStore: Send + Sync {
    fn get(&self, doc_id: &str) -> Option<String>;
}

/// An in-memory stand-in for the MySQL-backed title table.
#[derive(Default)]
pub struct InMemoryTitleStore {
    titles: RwLock<HashMap<String, String>>,
}

impl InMemoryTitleStore {
    pub fn new() -> Self {
        InMemoryTitleStore::default()
    }

    pub fn seeded(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let store = InMemoryTitleStore::new();
        store.titles.write().extend(entries);
        store
    }

    pub fn set(&self, doc_id: impl Into<String>, title: impl Into<String>) {
        self.titles.write().insert(doc_id.into(), title.into());
    }
}

impl TitleStore for InMemoryTitleStore {
    fn get(&self, doc_id: &str) -> Option<String> {
        self.titles.read().get(doc_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_doc_id_returns_none() {
        let store = InMemoryTitleStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn seeded_entries_are_queryable() {
        let store = InMemoryTitleStore::seeded([("1".to_string(), "Hello World".to_string())]);
        assert_eq!(store.get("1").as_deref(), Some("Hello World"));
    }
}
