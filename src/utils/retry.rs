use std::future::Future;
use tokio::time::{sleep, Duration};

/// Fixed-delay retry policy: up to `max_attempts` calls, pausing `delay`
/// between consecutive attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that never sleeps, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Runs `f` until it succeeds or the policy's attempts are exhausted,
/// returning the last error. `on_failure` sees each failed attempt number
/// (1-based) and its error before the pause.
pub async fn with_retry<F, Fut, T, E, L>(policy: RetryPolicy, f: F, mut on_failure: L) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    L: FnMut(u32, &E),
{
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempts += 1;
                on_failure(attempts, &e);
                if attempts >= policy.max_attempts {
                    return Err(e);
                }
                if !policy.delay.is_zero() {
                    sleep(policy.delay).await;
                }
            }
        }
    }
}
