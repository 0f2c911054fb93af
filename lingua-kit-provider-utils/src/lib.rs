//! Shared retry utilities for lingua-kit providers.
//!
//! Providers never retry internally; the orchestrator wraps every provider
//! call with [`retry_with_policy`], which classifies each failure into one
//! of two tiers:
//!
//! - **Network tier** — transport failures (connection refused/reset, DNS,
//!   broken pipe, premature EOF). Retried quickly: ~100 ms initial delay,
//!   capped at 5 s, up to `network_max_retries` attempts.
//! - **Semantic tier** — rate limits (429), server errors (5xx), and
//!   timeouts. Retried slowly: ~1 s initial delay, capped at 30 s, up to
//!   `max_retries` attempts.
//!
//! Non-retryable failures (auth, config, non-429 4xx, empty input,
//! malformed output) return immediately, and cancellation aborts pending
//! backoff sleeps.

pub mod retry;

pub use retry::{RetryPolicy, RetryTier, retry_with_policy};
