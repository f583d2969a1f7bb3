mod matrix;
mod posting;
mod ranker;
mod shard;
mod store;

pub use matrix::{DocVector, TfIdfMatrix};
pub use posting::{Posting, PostingList};
pub use shard::{hash32, shard_index, Shard, SHARD_COUNT};
pub use store::Index;
