//! Retry with exponential backoff for catalog requests.
//!
//! Throttling (429), transport failures and upstream 5xx responses are
//! retried. Everything else (auth failures, 404s, bad bodies) fails fast.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

fn is_retriable(err: &CatalogError) -> bool {
    match err {
        CatalogError::RateLimited { .. } | CatalogError::Http(_) => true,
        CatalogError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Seconds to wait before retry `attempt` (zero-based): `base * 2^attempt`,
/// raised to the provider's `Retry-After` on a 429, and never more than
/// `max_delay_secs`.
fn backoff_delay_secs(
    attempt: u32,
    base_secs: u64,
    max_delay_secs: u64,
    err: &CatalogError,
) -> u64 {
    let mut delay = base_secs.saturating_mul(1u64 << attempt.min(62));
    if let CatalogError::RateLimited { retry_after_secs } = err {
        delay = delay.max(*retry_after_secs);
    }
    delay.min(max_delay_secs)
}

/// Executes `operation`, retrying transient failures up to `max_retries`
/// additional times.
///
/// The wait before each retry comes from [`backoff_delay_secs`]. The last
/// error is returned once retries run out.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    max_delay_secs: u64,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_delay_secs(attempt, backoff_base_secs, max_delay_secs, &err);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient catalog error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
