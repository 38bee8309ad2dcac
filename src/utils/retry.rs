use crate::core::errors::ExchangeError;
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::warn;

const BASE_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Jittered exponential backoff starting at 100ms, capped at 5s per step.
pub fn default_backoff(max_retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(BASE_BACKOFF_MS / 2)
        .max_delay(MAX_BACKOFF)
        .map(jitter)
        .take(max_retries)
}

/// Run `action`, retrying only transport failures, one retry per delay in
/// `strategy`.
///
/// Exchange rejections and decode errors are returned immediately. Only use
/// this for idempotent calls: a timed-out order may still have been placed.
pub async fn retry_transport<S, A, F, T>(strategy: S, mut action: A) -> Result<T, ExchangeError>
where
    S: IntoIterator<Item = Duration>,
    A: FnMut() -> F,
    F: Future<Output = Result<T, ExchangeError>>,
{
    RetryIf::spawn(strategy, || action(), |err: &ExchangeError| {
        let retry = err.is_retryable();
        if retry {
            warn!(error = %err, "Transport failure, retrying");
        }
        retry
    })
    .await
}
