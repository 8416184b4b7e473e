use crate::config::RetryConfig;
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Delay before retry number `retry_index` (0-based): the initial backoff
/// doubled per retry, capped at `max_backoff_ms`
pub fn compute_backoff(cfg: &RetryConfig, retry_index: u32) -> Duration {
    let multiplier = 2u64.saturating_pow(retry_index);
    let delay_ms = cfg
        .initial_backoff_ms
        .saturating_mul(multiplier)
        .min(cfg.max_backoff_ms.max(cfg.initial_backoff_ms));
    Duration::from_millis(delay_ms)
}

/// Run `operation`, retrying only rate-limited failures
///
/// Makes at most `1 + max_retries` attempts. Any other error, or the last
/// rate-limited one, is returned as is.
pub async fn retry_rate_limited<F, Fut, T>(
    cfg: &RetryConfig,
    mut operation: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if retries > 0 {
                    tracing::info!(retries = retries, "Commentary call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_rate_limited() && retries < cfg.max_retries => {
                let delay = compute_backoff(cfg, retries);
                tracing::warn!(
                    attempt = retries + 1,
                    max_retries = cfg.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off"
                );
                sleep(delay).await;
                retries += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
