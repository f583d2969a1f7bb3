use parking_lot::RwLock;

use crate::core::error::{Error, ErrorKind, Result};

/// A fixed-capacity bitset answering "have I seen id `i`?" in O(1),
/// guarded by a single reader-writer lock.
///
/// Encoding: `word = id >> 6`, `bit = 1 << (id & 0x3f)`.
pub struct Bitset {
    capacity: u64,
    words: RwLock<Vec<u64>>,
}

fn parse_id(id_string: &str) -> Result<u64> {
    id_string
        .parse::<u64>()
        .map_err(|_| Error::new(ErrorKind::InvalidId, format!("not a decimal id: {id_string:?}")))
}

impl Bitset {
    pub fn new(capacity: u64) -> Self {
        let word_count = (capacity / 64) as usize + 1;
        Bitset { capacity, words: RwLock::new(vec![0u64; word_count]) }
    }

    fn check_capacity(&self, id: u64) -> Result<()> {
        if id >= self.capacity {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                format!("id {id} exceeds capacity {}", self.capacity),
            ));
        }
        Ok(())
    }

    pub fn set(&self, id_string: &str) -> Result<()> {
        let id = parse_id(id_string)?;
        self.check_capacity(id)?;
        let word = (id >> 6) as usize;
        let bit = 1u64 << (id & 0x3f);
        self.words.write()[word] |= bit;
        Ok(())
    }

    pub fn exist(&self, id_string: &str) -> Result<bool> {
        let id = parse_id(id_string)?;
        self.check_capacity(id)?;
        let word = (id >> 6) as usize;
        let bit = 1u64 << (id & 0x3f);
        Ok(self.words.read()[word] & bit != 0)
    }

    /// Clear the bit for `id_string`. Never called by the core ingest
    /// pipeline; kept for administrative/test use.
    pub fn clear(&self, id_string: &str) -> Result<()> {
        let id = parse_id(id_string)?;
        self.check_capacity(id)?;
        let word = (id >> 6) as usize;
        let bit = 1u64 << (id & 0x3f);
        self.words.write()[word] &= !bit;
        Ok(())
    }

    pub fn population_count(&self) -> u64 {
        self.words.read().iter().map(|w| w.count_ones() as u64).sum()
    }

    pub fn snapshot_words(&self) -> Vec<u64> {
        self.words.read().clone()
    }

    pub fn restore_words(&self, words: Vec<u64>) {
        *self.words.write() = words;
    }
}

pub const DOC_CAPACITY: u64 = 10_000;
pub const VOCAB_CAPACITY: u64 = 100_000;

pub struct DocRegistry(Bitset);
pub struct VocabRegistry(Bitset);

impl DocRegistry {
    pub fn new() -> Self {
        DocRegistry(Bitset::new(DOC_CAPACITY))
    }
}

impl Default for DocRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabRegistry {
    pub fn new() -> Self {
        VocabRegistry(Bitset::new(VOCAB_CAPACITY))
    }
}

impl Default for VocabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! delegate_bitset {
    ($ty:ty) => {
        impl $ty {
            pub fn set(&self, id_string: &str) -> Result<()> {
                self.0.set(id_string)
            }
            pub fn exist(&self, id_string: &str) -> Result<bool> {
                self.0.exist(id_string)
            }
            pub fn clear(&self, id_string: &str) -> Result<()> {
                self.0.clear(id_string)
            }
            pub fn population_count(&self) -> u64 {
                self.0.population_count()
            }
            pub fn snapshot_words(&self) -> Vec<u64> {
                self.0.snapshot_words()
            }
            pub fn restore_words(&self, words: Vec<u64>) {
                self.0.restore_words(words)
            }
        }
    };
}

delegate_bitset!(DocRegistry);
delegate_bitset!(VocabRegistry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_exist_round_trip() {
        let reg = DocRegistry::new();
        assert!(!reg.exist("42").unwrap());
        reg.set("42").unwrap();
        assert!(reg.exist("42").unwrap());
        assert_eq!(reg.population_count(), 1);
    }

    #[test]
    fn capacity_exceeded_rejected() {
        let reg = DocRegistry::new();
        let err = reg.set("10001").unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
        assert_eq!(reg.population_count(), 0);
    }

    #[test]
    fn invalid_id_rejected() {
        let reg = DocRegistry::new();
        let err = reg.set("not-a-number").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidId);
    }

    #[test]
    fn clear_unsets_bit() {
        let reg = VocabRegistry::new();
        reg.set("7").unwrap();
        reg.clear("7").unwrap();
        assert!(!reg.exist("7").unwrap());
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let reg = DocRegistry::new();
        reg.set("1").unwrap();
        reg.set("64").unwrap();
        reg.set("9999").unwrap();
        let words = reg.snapshot_words();

        let restored = DocRegistry::new();
        restored.restore_words(words);
        assert!(restored.exist("1").unwrap());
        assert!(restored.exist("64").unwrap());
        assert!(restored.exist("9999").unwrap());
        assert_eq!(restored.population_count(), 3);
    }
}
