//! Operation deadlines

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::domain::DomainError;

/// Run `operation` to completion or until `limit` elapses
///
/// On expiry the future is dropped, aborting any outstanding store call, and
/// `Cancelled` is returned. The caller must not assume the operation's write
/// was committed.
pub async fn bounded<T, F>(
    limit: Option<Duration>,
    operation: &'static str,
    future: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    let Some(limit) = limit else {
        return future.await;
    };

    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Operation timed out"
            );
            Err(DomainError::cancelled(format!(
                "{} did not complete within {}ms",
                operation,
                limit.as_millis()
            )))
        }
    }
}
