use crate::client::ClientError;
use crate::config::RetryConfig;
use std::future::Future;

/// Runs `operation` until it succeeds, fails with something other than a
/// stale element, or `policy.max_attempts` attempts have been made.
///
/// Each attempt re-runs the whole operation, so it must re-locate the
/// elements it touches rather than reuse handles from a failed attempt.
pub async fn retry<T, F, Fut>(
    policy: &RetryConfig,
    what: &str,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(e) if e.is_stale() && attempt < attempts => {
                ::log::debug!(
                    "Stale element while {} (attempt {}/{}), retrying",
                    what,
                    attempt,
                    attempts
                );
                tokio::time::sleep(policy.backoff()).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
