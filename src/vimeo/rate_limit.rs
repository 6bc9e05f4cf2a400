//! Cooldown tracking after the API signals a rate limit.

use super::transport::TransportError;
use crate::error::{Result, VimeoError};
use std::future::Future;
use std::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::warn;

/// Wait applied when a 429 arrives without a usable `retry-after` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest cooldown honoured from a `retry-after` header.
pub const MAX_RETRY_AFTER_SECS: u64 = 24 * 60 * 60;

/// Single cooldown window shared by every call a client makes.
///
/// Vimeo limits per account, so one window covers all endpoints. The lock is
/// never held across an await point.
#[derive(Debug, Default)]
pub struct RateLimitGuard {
    cooldown_until: Mutex<Option<Instant>>,
}

impl RateLimitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail fast if the cooldown window is still open.
    pub fn check(&self) -> Result<()> {
        self.check_at(Instant::now())
    }

    pub fn check_at(&self, now: Instant) -> Result<()> {
        let guard = self.cooldown_until.lock().unwrap_or_else(|e| e.into_inner());
        match *guard {
            Some(until) if now < until => Err(VimeoError::RateLimited {
                retry_after_secs: ceil_secs(until - now),
            }),
            _ => Ok(()),
        }
    }

    /// Open a cooldown window of `retry_after_secs` starting at `now`.
    pub fn record_at(&self, now: Instant, retry_after_secs: u64) {
        let mut guard = self.cooldown_until.lock().unwrap_or_else(|e| e.into_inner());
        let until = now
            .checked_add(Duration::from_secs(retry_after_secs))
            .unwrap_or_else(|| now + Duration::from_secs(MAX_RETRY_AFTER_SECS));
        *guard = Some(until);
    }

    /// Seconds left in the current window, if any.
    pub fn remaining(&self) -> Option<u64> {
        self.check().err().and_then(|e| e.retry_after())
    }

    /// Run one attempt through the guard, translating its failure.
    ///
    /// A 429 opens the cooldown window and becomes [`VimeoError::RateLimited`];
    /// any other status becomes [`VimeoError::Api`]; failures without a status
    /// pass through as [`VimeoError::Transport`].
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, TransportError>>,
    {
        self.check()?;

        match operation().await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.classify(err)),
        }
    }

    fn classify(&self, err: TransportError) -> VimeoError {
        match err.status_code() {
            Some(429) => {
                let retry_after = err
                    .header("retry-after")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
                    .min(MAX_RETRY_AFTER_SECS);
                warn!(retry_after, "Rate limited by Vimeo, cooling down");
                self.record_at(Instant::now(), retry_after);
                VimeoError::RateLimited {
                    retry_after_secs: retry_after,
                }
            }
            Some(status) => VimeoError::Api {
                status,
                message: err.to_string(),
            },
            None => VimeoError::Transport(err),
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn too_many(retry_after: Option<&'static str>) -> TransportError {
        let mut headers = HeaderMap::new();
        if let Some(v) = retry_after {
            headers.insert("retry-after", HeaderValue::from_static(v));
        }
        TransportError::Status {
            status: 429,
            message: "Too many requests".to_string(),
            headers,
        }
    }

    #[test]
    fn test_window_bounds() {
        let guard = RateLimitGuard::new();
        let start = Instant::now();
        guard.record_at(start, 30);

        let err = assert_err!(guard.check_at(start + Duration::from_millis(500)));
        assert_eq!(err.retry_after(), Some(30));

        let err = assert_err!(guard.check_at(start + Duration::from_secs(29)));
        assert_eq!(err.retry_after(), Some(1));

        assert_ok!(guard.check_at(start + Duration::from_secs(30)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_429_opens_window_and_blocks_calls() {
        let guard = RateLimitGuard::new();
        let calls = AtomicUsize::new(0);

        let err = guard
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(too_many(Some("30")))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, VimeoError::RateLimited { retry_after_secs: 30 }));

        tokio::time::advance(Duration::from_secs(10)).await;
        let err = guard
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TransportError>(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(20));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(21)).await;
        guard
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TransportError>(())
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_retry_after_defaults_to_sixty() {
        let guard = RateLimitGuard::new();
        let err = guard
            .run(|| async { Err::<(), _>(too_many(None)) })
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(DEFAULT_RETRY_AFTER_SECS));
        assert_eq!(guard.remaining(), Some(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_retry_after_is_capped() {
        let guard = RateLimitGuard::new();
        let err = guard
            .run(|| async { Err::<(), _>(too_many(Some("18446744073709551615"))) })
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(MAX_RETRY_AFTER_SECS));
        assert_eq!(guard.remaining(), Some(MAX_RETRY_AFTER_SECS));

        tokio::time::advance(Duration::from_secs(MAX_RETRY_AFTER_SECS)).await;
        assert_ok!(guard.check());
    }

    #[test]
    fn test_record_never_overflows() {
        let guard = RateLimitGuard::new();
        let start = Instant::now();
        guard.record_at(start, u64::MAX);

        let err = assert_err!(guard.check_at(start));
        assert_eq!(err.retry_after(), Some(MAX_RETRY_AFTER_SECS));
    }

    #[tokio::test]
    async fn test_other_failures_are_classified() {
        let guard = RateLimitGuard::new();

        let err = guard
            .run(|| async { Err::<(), _>(TransportError::status(404, "The requested video couldn't be found.")) })
            .await
            .unwrap_err();
        match err {
            VimeoError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "The requested video couldn't be found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = guard
            .run(|| async { Err::<(), _>(TransportError::Decode("garbage".to_string())) })
            .await
            .unwrap_err();
        assert!(matches!(err, VimeoError::Transport(TransportError::Decode(_))));

        // Neither failure opens a cooldown.
        assert!(guard.check().is_ok());
    }
}
