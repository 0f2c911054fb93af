use lingua_kit_provider::ProviderError;
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounds and delays for the two retry tiers.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempt limit for the semantic tier (429, 5xx, timeouts).
    pub max_retries: u32,

    /// Attempt limit for the network tier (transport failures).
    pub network_max_retries: u32,

    /// First delay on the semantic tier.
    pub initial_delay: Duration,

    /// Delay cap on the semantic tier.
    pub max_delay: Duration,

    /// First delay on the network tier.
    pub network_initial_delay: Duration,

    /// Delay cap on the network tier.
    pub network_max_delay: Duration,

    /// Exponential growth factor applied per attempt on both tiers.
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            network_max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            network_initial_delay: Duration::from_millis(100),
            network_max_delay: Duration::from_secs(5),
            backoff_factor: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries. Useful for tests and dry runs.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            network_max_retries: 0,
            ..Self::default()
        }
    }

    /// The backoff delay before retry attempt `attempt` (1-based) on the
    /// given tier. A server-provided `retry_after` overrides the computed
    /// delay when it is larger.
    pub fn delay_for(
        &self,
        tier: RetryTier,
        attempt: u32,
        retry_after: Option<Duration>,
    ) -> Duration {
        let (initial, cap) = match tier {
            RetryTier::Network => (self.network_initial_delay, self.network_max_delay),
            RetryTier::Semantic => (self.initial_delay, self.max_delay),
        };
        let factor = self
            .backoff_factor
            .max(1)
            .saturating_pow(attempt.saturating_sub(1));
        let computed = initial.saturating_mul(factor).min(cap);
        match retry_after {
            Some(hint) if hint > computed => hint,
            _ => computed,
        }
    }
}

/// Which retry tier a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTier {
    /// Fast retries for transport-level failures.
    Network,
    /// Slow retries for rate limits, server errors, and timeouts.
    Semantic,
}

/// Classifies an error into a retry tier, or `None` when it must not be
/// retried.
pub fn classify(error: &ProviderError) -> Option<RetryTier> {
    if error.is_network() {
        Some(RetryTier::Network)
    } else if error.is_retryable() {
        Some(RetryTier::Semantic)
    } else {
        None
    }
}

/// Runs `op` with two-tier exponential backoff.
///
/// The closure receives the 0-based overall attempt number and must build a
/// fresh request each time (requests are `Clone`, so replay is safe).
/// Backoff sleeps race the cancellation token; cancellation returns
/// [`ProviderError::Cancelled`] without running further attempts.
///
/// # Errors
///
/// Returns the last error unchanged once the tier's attempt budget is
/// exhausted, or immediately for non-retryable failures.
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt: u32 = 0;
    let mut network_attempts: u32 = 0;
    let mut semantic_attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let Some(tier) = classify(&error) else {
                    return Err(error);
                };

                let (attempts, budget) = match tier {
                    RetryTier::Network => (&mut network_attempts, policy.network_max_retries),
                    RetryTier::Semantic => (&mut semantic_attempts, policy.max_retries),
                };
                *attempts += 1;
                if *attempts > budget {
                    warn!(
                        "giving up after {} {:?}-tier attempts: {}",
                        *attempts, tier, error
                    );
                    return Err(error);
                }

                let retry_after = match &error {
                    ProviderError::RateLimited { retry_after } => *retry_after,
                    _ => None,
                };
                let delay = policy.delay_for(tier, *attempts, retry_after);
                debug!(
                    "retrying after {:?} ({:?} tier, attempt {}): {}",
                    delay, tier, *attempts, error
                );

                tokio::select! {
                    _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}
