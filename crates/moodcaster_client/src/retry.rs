//! Bounded retry with linear backoff.

use derive_getters::Getters;
use moodcaster_error::RetryableError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Retry configuration for generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    max_retries: u32,
    /// Delay before the first retry; the n-th retry waits n times this
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use moodcaster_client::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_for(1), Duration::from_millis(700));
    /// assert_eq!(policy.delay_for(2), Duration::from_millis(1400));
    /// ```
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(700))
    }
}

/// Runs `operation` until it succeeds, fails permanently or retries run out.
///
/// Attempts are sequential. Only errors whose [`RetryableError::is_retryable`]
/// returns true are retried.
#[instrument(skip(operation))]
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let mut retry = 0;

    loop {
        debug!(attempt = retry + 1, "Executing operation");

        match operation().await {
            Ok(result) => {
                if retry > 0 {
                    debug!(attempt = retry + 1, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(err) => {
                if !err.is_retryable() {
                    warn!(error = %err, "Error is not retryable, failing immediately");
                    return Err(err);
                }
                if retry >= policy.max_retries {
                    warn!(attempts = retry + 1, error = %err, "All retry attempts exhausted");
                    return Err(err);
                }

                retry += 1;
                let delay = policy.delay_for(retry);
                debug!(
                    backoff_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying after failure"
                );
                sleep(delay).await;
            }
        }
    }
}
