use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::core::error::Result;

/// The exponential backoff policy shared by every adapter call that can
/// hit transient I/O failures: 600ms initial interval, x10 multiplier,
/// capped at 30s between attempts, capped at 90s total elapsed, and at
/// most 5 attempts.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy {
            initial_interval: Duration::from_millis(600),
            multiplier: 10.0,
            max_interval: Duration::from_secs(30),
            max_elapsed: Duration::from_secs(90),
            max_retries: 5,
        }
    }
}

/// Retries `operation` under `policy`, sleeping between attempts and
/// giving up once the retry count, or the elapsed wall clock, runs out
/// — whichever comes first. The last error is returned to the caller.
pub async fn retry_with_backoff<T, F, Fut>(policy: BackoffPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let mut interval = policy.initial_interval;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.max_retries || start.elapsed() >= policy.max_elapsed {
                    return Err(err);
                }
                log::warn!("retrying after transient failure (attempt {attempt}): {err}");
                sleep(interval).await;
                interval = Duration::from_secs_f64(interval.as_secs_f64() * policy.multiplier)
                    .min(policy.max_interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{Error, ErrorKind};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let policy = BackoffPolicy { initial_interval: Duration::from_millis(1), ..Default::default() };
        let result = retry_with_backoff(policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::new(ErrorKind::BlobIoError, "transient"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_attempts() {
        let policy = BackoffPolicy { initial_interval: Duration::from_millis(1), ..Default::default() };
        let result: Result<()> = retry_with_backoff(policy, || async {
            Err(Error::new(ErrorKind::TitleLookupError, "always fails"))
        })
        .await;
        assert_eq!(result.unwrap_err().kind, ErrorKind::TitleLookupError);
    }
}
