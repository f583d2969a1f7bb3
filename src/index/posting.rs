use serde::{Deserialize, Serialize};

/// One document's entry for a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub term_frequency: u64,
    pub doc_idx: u64,
    pub doc_id: String,
}

/// The ordered collection of all postings for one term, sorted by
/// descending `term_frequency` with insertion-order tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingList {
    pub term_id: String,
    pub doc_frequency: u64,
    pub postings: Vec<Posting>,
}

impl PostingList {
    pub fn new(term_id: String, posting: Posting) -> Self {
        PostingList { term_id, doc_frequency: 1, postings: vec![posting] }
    }

    /// Splice `posting` into the ordered sequence at the first position
    /// whose successor has a strictly smaller `term_frequency`; if no
    /// such position exists, append at the tail. Ties are stable: the
    /// newer posting lands after the existing tied entry.
    pub fn insert(&mut self, posting: Posting) {
        let freq = posting.term_frequency;
        let pos = self
            .postings
            .iter()
            .position(|p| freq > p.term_frequency)
            .unwrap_or(self.postings.len());
        self.postings.insert(pos, posting);
        self.doc_frequency += 1;
    }

    pub fn is_sorted_descending(&self) -> bool {
        self.postings.windows(2).all(|w| w[0].term_frequency >= w[1].term_frequency)
    }
}
