//! Retry utilities for the Google Trends client.
//!
//! Google answers bursts with HTTP 429; those and network-level failures are
//! retried with exponential backoff. Parse failures, missing widgets and
//! other non-transient errors are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::TrendsError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`TrendsError::RateLimited`]: HTTP 429.
/// - [`TrendsError::Http`]: timeout, connection failure or a 5xx status.
/// - [`TrendsError::UnexpectedStatus`] with a 5xx status.
fn is_retriable(err: &TrendsError) -> bool {
    match err {
        TrendsError::RateLimited { .. } => true,
        TrendsError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        TrendsError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        TrendsError::Deserialize { .. }
        | TrendsError::MissingWidget(_)
        | TrendsError::NoPayload
        | TrendsError::InvalidBaseUrl { .. } => false,
    }
}

/// Minimum wait requested by the server, in milliseconds, capped at 60 s.
fn retry_after_floor_ms(err: &TrendsError) -> u64 {
    match err {
        TrendsError::RateLimited { retry_after_secs } => {
            retry_after_secs.saturating_mul(1000).min(MAX_DELAY_MS)
        }
        _ => 0,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The wait before the n-th retry is `backoff_base_ms * 2^(n-1)` with ±25 %
/// jitter, capped at 60 s. A 429 waits at least its `Retry-After`, under the
/// same cap. With `max_retries = 3` the operation is attempted at most 4
/// times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, TrendsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TrendsError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let delay_ms = jittered.max(retry_after_floor_ms(&err));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Google Trends error; retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> TrendsError {
        TrendsError::RateLimited {
            retry_after_secs: 0,
        }
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&TrendsError::UnexpectedStatus {
            status: 503,
            url: "https://trends.google.com".to_owned(),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&TrendsError::UnexpectedStatus {
            status: 400,
            url: "https://trends.google.com".to_owned(),
        }));
        assert!(!is_retriable(&TrendsError::MissingWidget("TIMESERIES")));
        assert!(!is_retriable(&TrendsError::NoPayload));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, TrendsError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, TrendsError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, TrendsError>(rate_limited())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(TrendsError::RateLimited { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_retry_waits_for_retry_after() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let start = tokio::time::Instant::now();
        let result = retry_with_backoff(3, 1, || {
            let cc = Arc::clone(&cc);
            async move {
                if cc.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(TrendsError::RateLimited {
                        retry_after_secs: 5,
                    })
                } else {
                    Ok::<u32, TrendsError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[test]
    fn retry_after_floor_is_capped() {
        let huge = TrendsError::RateLimited {
            retry_after_secs: 3600,
        };
        assert_eq!(retry_after_floor_ms(&huge), MAX_DELAY_MS);
        assert_eq!(retry_after_floor_ms(&rate_limited()), 0);
        assert_eq!(retry_after_floor_ms(&TrendsError::NoPayload), 0);
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, TrendsError>(TrendsError::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(TrendsError::Deserialize { .. })));
    }
}
