//! Retry policy for API calls.

use std::future::Future;
use std::time::Duration;

use lapakgaming_core::{LapakError, DEFAULT_RETRY_ATTEMPTS};

/// Default wait between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry with a fixed delay.
///
/// Errors for which [`LapakError::is_retryable`] is false are returned
/// immediately. Otherwise the action is repeated until it succeeds or
/// `max_attempts` is reached, and the last error is returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Wait between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy with the given number of attempts and the default delay.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn none() -> Self {
        Self::new(1)
    }

    /// Set the wait between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run `action` under this policy.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once every
    /// attempt has failed.
    pub async fn run<T, F, Fut>(&self, mut action: F) -> Result<T, LapakError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LapakError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match action().await {
                Ok(value) => return Ok(value),
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) if attempt >= attempts => {
                    tracing::warn!(attempts, error = %error, "Giving up after final attempt");
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "API call failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
