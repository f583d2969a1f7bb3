/// One document's row in the TF-IDF matrix.
#[derive(Debug, Clone)]
pub struct DocVector {
    pub doc_id: String,
    pub values: Vec<f32>,
}

impl DocVector {
    pub fn zeroed(vocab_count: usize) -> Self {
        DocVector { doc_id: String::new(), values: vec![0.0; vocab_count] }
    }
}

/// A contiguous per-document matrix, built once per quiesce and replaced
/// wholesale on each rebuild. Readers hold an `Arc` clone, so an
/// in-flight query is never disturbed by a concurrent rebuild.
#[derive(Debug, Clone, Default)]
pub struct TfIdfMatrix {
    pub rows: Vec<DocVector>,
}

impl TfIdfMatrix {
    pub fn new(rows: Vec<DocVector>) -> Self {
        TfIdfMatrix { rows }
    }
}
