//! Fixed-delay retry for completion requests.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use tracing::warn;

/// Defaults: 3 total attempts, 500 ms between attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_retries: u32,
    /// Fixed pause between attempts. The delay does not grow.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Retry an async operation on a constant schedule.
///
/// `attempt` receives the 1-based attempt number. Errors for which
/// `is_transient` returns false are returned immediately. When the last
/// allowed attempt fails, `wrap_exhausted` turns the attempt count and the
/// final error into the caller's exhausted variant.
pub async fn retry_fixed<T, E, Fut, F, P, W>(
    policy: &RetryPolicy,
    mut attempt: F,
    is_transient: P,
    wrap_exhausted: W,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    W: FnOnce(u32, E) -> E,
    E: fmt::Display,
{
    let max_attempts = policy.max_retries.max(1);
    let mut schedule = Constant::new(policy.retry_delay);
    let mut attempts = 0;

    loop {
        attempts += 1;

        match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(e) if !is_transient(&e) => return Err(e),
            Err(e) => {
                if attempts >= max_attempts {
                    return Err(wrap_exhausted(attempts, e));
                }

                warn!("({}/{}) retrying after: {}", attempts, max_attempts, e);
                if let Some(wait_duration) = schedule.next_backoff() {
                    tokio::time::sleep(wait_duration).await;
                }
            }
        }
    }
}
