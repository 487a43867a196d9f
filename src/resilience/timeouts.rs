//! Timeout enforcement.
//!
//! # Responsibilities
//! - Put a deadline on a single protected operation
//! - Keep "ran out of time" distinct from the operation's own error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the pending future is dropped on expiry
//! - The breaker never imposes a deadline itself. Wrap the operation with
//!   `with_timeout` before handing it over, so a hang is recorded as a failure

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Error from a deadline-bounded operation.
#[derive(Debug, Error)]
pub enum TimeoutError<E> {
    /// The deadline passed before the operation completed.
    #[error("operation timed out after {0:?}")]
    Elapsed(Duration),

    /// The operation completed in time but failed.
    #[error(transparent)]
    Inner(E),
}

impl<E> TimeoutError<E> {
    pub fn is_elapsed(&self) -> bool {
        matches!(self, TimeoutError::Elapsed(_))
    }
}

/// Run `operation`, failing with `TimeoutError::Elapsed` once `deadline` passes.
pub async fn with_timeout<T, E, Fut>(
    deadline: Duration,
    operation: Fut,
) -> Result<T, TimeoutError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result.map_err(TimeoutError::Inner),
        Err(_) => {
            tracing::warn!(
                deadline_ms = deadline.as_millis() as u64,
                "Operation timed out"
            );
            Err(TimeoutError::Elapsed(deadline))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, ()>(5) }).await;
        assert_eq!(result.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result = with_timeout(Duration::from_secs(1), async { Err::<(), _>("refused") }).await;
        match result {
            Err(TimeoutError::Inner(e)) => assert_eq!(e, "refused"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_elapsed_is_distinct() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok::<_, &str>(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_elapsed());
        assert_eq!(err.to_string(), "operation timed out after 10ms");
    }
}
