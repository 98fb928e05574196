//! Bounded exponential backoff for transient provider failures.

use copilot_ai::Error as CapabilityError;
use log::*;
use service::config::Config;
use std::future::Future;
use std::time::Duration;

/// Retry policy shared by every provider-facing call in the pipeline.
///
/// Only errors reporting themselves transient are retried; rejections,
/// not-found and configuration errors surface on the first attempt. Delays
/// grow exponentially from `base_delay` and are capped at `max_delay`.
#[derive(Clone, Debug)]
pub struct Backoff {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Backoff {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            // At least one attempt always runs
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.retry_max_attempts,
            Duration::from_millis(config.retry_base_delay_ms),
            Duration::from_millis(config.retry_max_delay_ms),
        )
    }

    /// Calculate exponential backoff delay for the given past-attempt count.
    fn exponential_delay(&self, n_attempts: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * 2_f64.powi(n_attempts as i32);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    /// Run `operation` until it succeeds, fails fatally, or attempts are
    /// exhausted. The last error is returned on exhaustion.
    pub async fn retry<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, CapabilityError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CapabilityError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = self.exponential_delay(attempt);
                    warn!(
                        "{label}: transient failure on attempt {} of {}, retrying in {:?}: {err}",
                        attempt + 1,
                        self.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_backoff(max_attempts: u32) -> Backoff {
        Backoff::new(
            max_attempts,
            Duration::from_millis(1),
            Duration::from_millis(4),
        )
    }

    #[test]
    fn exponential_delay_doubles_and_caps() {
        let backoff = Backoff::new(5, Duration::from_secs(1), Duration::from_secs(4));

        assert_eq!(backoff.exponential_delay(0).as_secs(), 1);
        assert_eq!(backoff.exponential_delay(1).as_secs(), 2);
        assert_eq!(backoff.exponential_delay(2).as_secs(), 4);
        // Capped from here on
        assert_eq!(backoff.exponential_delay(3).as_secs(), 4);
        assert_eq!(backoff.exponential_delay(10).as_secs(), 4);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = fast_backoff(3)
            .retry("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(CapabilityError::Network("flaky".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_errors_surface_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = fast_backoff(5)
            .retry("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CapabilityError::Provider("rejected".to_string())) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_returns_the_last_transient_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = fast_backoff(3)
            .retry("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CapabilityError::Timeout("still down".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(CapabilityError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
