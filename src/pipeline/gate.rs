use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit};

/// The fixed-capacity token bucket throttling concurrent ingest work,
/// independent of how many documents are in flight through the
/// preceding pipeline stages. Mirrors the upstream indexer's
/// `TokenBucket chan struct{}` buffered to 20 slots.
pub struct AdmissionGate {
    semaphore: Semaphore,
}

pub const ADMISSION_TOKENS: usize = 20;

impl AdmissionGate {
    pub fn new(tokens: usize) -> Arc<Self> {
        Arc::new(AdmissionGate { semaphore: Semaphore::new(tokens) })
    }

    /// Acquires a token, suspending the caller until one is free. The
    /// returned permit releases automatically on drop, including on
    /// the error paths of whatever ingest work it guards.
    pub async fn acquire(&self) -> SemaphorePermit<'_> {
        self.semaphore.acquire().await.expect("admission gate semaphore never closes")
    }

    pub fn available_tokens(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        AdmissionGate { semaphore: Semaphore::new(ADMISSION_TOKENS) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_caps_concurrency_at_capacity() {
        let gate = AdmissionGate::new(2);
        let _first = gate.acquire().await;
        let _second = gate.acquire().await;
        assert_eq!(gate.available_tokens(), 0);
    }

    #[tokio::test]
    async fn releasing_a_permit_frees_a_token() {
        let gate = AdmissionGate::new(1);
        {
            let _permit = gate.acquire().await;
            assert_eq!(gate.available_tokens(), 0);
        }
        assert_eq!(gate.available_tokens(), 1);
    }
}
