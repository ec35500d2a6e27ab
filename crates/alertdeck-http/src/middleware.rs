//! Replay of idempotent backend calls

use std::{future::Future, time::Duration};

use tracing::warn;

use crate::{config::HttpConfig, error::HttpError, Result};

/// Longest wait between two replays
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// How often, and how patiently, a failed call is replayed
///
/// Only GET, PUT and DELETE go through here. Bulk condition saves are
/// replace-all PUTs, so a replay cannot duplicate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Replays after the first attempt
    pub retries: u32,
    /// Wait before the first replay; doubled for each later one
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            retries: config.retry_count,
            backoff: config.retry_backoff(),
        }
    }

    /// Wait before replay number `replay` (zero-based), capped at ten seconds
    pub fn delay_for(&self, replay: u32) -> Duration {
        self.backoff
            .checked_mul(1u32.checked_shl(replay).unwrap_or(u32::MAX))
            .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
    }

    /// Run `call` until it succeeds, fails permanently or runs out of replays
    pub async fn run<F, Fut, T>(&self, call: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut replay = 0;
        loop {
            let err = match call().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };
            if replay == self.retries {
                return Err(HttpError::RetryLimitExceeded {
                    attempts: replay + 1,
                    last: err.to_string(),
                });
            }
            let delay = self.delay_for(replay);
            warn!(
                replay = replay + 1,
                of = self.retries,
                ?delay,
                "Backend call failed, replaying: {err}"
            );
            tokio::time::sleep(delay).await;
            replay += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            backoff: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            retries: 40,
            backoff: Duration::from_millis(250),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(6), MAX_BACKOFF);
        assert_eq!(policy.delay_for(39), MAX_BACKOFF);
    }

    #[test]
    fn test_from_config() {
        let config = HttpConfig::fast().with_retry_count(3);
        assert_eq!(
            RetryPolicy::from_config(&config),
            RetryPolicy {
                retries: 3,
                backoff: Duration::from_millis(250)
            }
        );
    }

    #[tokio::test]
    async fn test_transient_failure_is_replayed() {
        let calls = AtomicU32::new(0);
        let result = policy(2)
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(HttpError::Timeout(Duration::from_secs(1)))
                } else {
                    Ok("saved")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "saved");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_replays_report_attempts() {
        let result = policy(2)
            .run(|| async { Err::<(), _>(HttpError::Timeout(Duration::from_secs(1))) })
            .await;

        assert!(matches!(
            result,
            Err(HttpError::RetryLimitExceeded { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_replayed() {
        let calls = AtomicU32::new(0);
        let result = policy(3)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(HttpError::InvalidUrl("bad".to_string()))
            })
            .await;

        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
