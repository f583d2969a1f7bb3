mod bitset;

pub use bitset::{Bitset, DocRegistry, VocabRegistry, DOC_CAPACITY, VOCAB_CAPACITY};
