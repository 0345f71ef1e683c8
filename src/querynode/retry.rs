use std::future::Future;
use tracing::warn;

use crate::config::RetryConfig;
use crate::error::{BotError, Result};

/// Run `call` under the retry policy.
///
/// A call is attempted again when it errors or when `is_retryable` flags its
/// response (the query node answers "no error, empty payload" while it is
/// still catching up). After `max_attempts` the last transport error is
/// returned, or [`BotError::QueryNodeEmpty`] when the last attempt came back
/// empty.
pub async fn retry_query<T, F, Fut, P>(
    config: &RetryConfig,
    operation: &str,
    is_retryable: P,
    mut call: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match call().await {
            Ok(response) if !is_retryable(&response) => return Ok(response),
            Ok(_) => {
                warn!(
                    "Query '{}' attempt {}/{} returned no data",
                    operation, attempt, max_attempts
                );
                last_error = None;
            }
            Err(e) => {
                warn!(
                    "Query '{}' attempt {}/{} failed: {}",
                    operation, attempt, max_attempts, e
                );
                last_error = Some(e);
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(config.backoff(attempt)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| BotError::QueryNodeEmpty {
        operation: operation.to_string(),
        attempts: max_attempts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_retries(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_backoff_ms: 0,
            multiplier: 1,
            max_backoff_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_returns_first_usable_response() {
        let calls = AtomicU32::new(0);
        let result = retry_query(&instant_retries(3), "test", |v: &Vec<u32>| v.is_empty(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(vec![1]) }
        })
        .await
        .unwrap();

        assert_eq!(result, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result = retry_query(&instant_retries(4), "test", |v: &Vec<u32>| v.is_empty(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Vec::new()) }
        })
        .await;

        assert!(matches!(
            result,
            Err(BotError::QueryNodeEmpty { attempts: 4, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_recovers_after_errors() {
        let calls = AtomicU32::new(0);
        let result = retry_query(&instant_retries(5), "test", |v: &Vec<u32>| v.is_empty(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(BotError::GraphQl {
                        message: "lagging".to_string(),
                    })
                } else {
                    Ok(vec![n])
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_surfaces_last_error() {
        let result: Result<Vec<u32>> =
            retry_query(&instant_retries(2), "test", |v: &Vec<u32>| v.is_empty(), || async {
                Err(BotError::GraphQl {
                    message: "down".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(BotError::GraphQl { .. })));
    }
}
