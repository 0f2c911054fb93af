use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling a translation provider.
///
/// Every backend failure is mapped into one of these variants so the retry
/// layer can classify it without inspecting provider-specific details. The
/// display strings are intentionally short and user-facing; transport
/// internals belong in the `source` chain, not the message.
///
/// # Retryability
///
/// - [`ProviderError::Network`] errors are retried on the fast network tier.
/// - [`ProviderError::RateLimited`], [`ProviderError::ServerError`], and
///   [`ProviderError::Timeout`] are retried on the slower semantic tier.
/// - Everything else is not retryable; [`ProviderError::InvalidAuth`],
///   [`ProviderError::InvalidConfig`], and [`ProviderError::Cancelled`] are
///   fatal and abort the whole pipeline.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider is misconfigured (missing base URL, unknown ID, ...).
    #[error("Invalid provider configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration
        message: String,
    },

    /// Authentication was rejected (401/403).
    #[error("Invalid API key")]
    InvalidAuth {
        /// Detail kept out of the user-facing message
        message: String,
    },

    /// The provider rejected the request with 429.
    #[error("Rate limited by provider")]
    RateLimited {
        /// Server-provided delay from a `Retry-After` header, if any
        retry_after: Option<Duration>,
    },

    /// The request exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// A transport-level failure (connection refused/reset, DNS, broken
    /// pipe, premature EOF).
    #[error("Network error: {message}")]
    Network {
        /// Short description of the transport failure
        message: String,
        /// Underlying transport error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider returned a 5xx status.
    #[error("Provider server error ({status})")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response detail kept out of the user-facing message
        message: String,
    },

    /// The provider returned a non-429 4xx status.
    #[error("Provider rejected the request ({status})")]
    ClientError {
        /// HTTP status code
        status: u16,
        /// Response detail kept out of the user-facing message
        message: String,
    },

    /// The request carried no translatable text.
    #[error("Empty input")]
    EmptyInput,

    /// The provider returned output the caller could not use (empty body,
    /// unparseable JSON, missing choices).
    #[error("Malformed provider output: {message}")]
    MalformedOutput {
        /// What was wrong with the output
        message: String,
    },

    /// The operation was cancelled via the cancellation token.
    #[error("Operation cancelled")]
    Cancelled,
}

impl ProviderError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_auth(message: impl Into<String>) -> Self {
        Self::InvalidAuth {
            message: message.into(),
        }
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    pub fn network_with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    pub fn client_error(status: u16, message: impl Into<String>) -> Self {
        Self::ClientError {
            status,
            message: message.into(),
        }
    }

    pub fn malformed_output(message: impl Into<String>) -> Self {
        Self::MalformedOutput {
            message: message.into(),
        }
    }

    /// Maps an HTTP status code to the matching error variant.
    ///
    /// 401/403 become [`ProviderError::InvalidAuth`], 408 becomes
    /// [`ProviderError::Timeout`], 429 becomes [`ProviderError::RateLimited`],
    /// other 4xx become [`ProviderError::ClientError`], and 5xx become
    /// [`ProviderError::ServerError`]. Non-error statuses map to
    /// [`ProviderError::MalformedOutput`] since callers only reach this path
    /// when the response was unusable.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::invalid_auth(message),
            408 => Self::Timeout,
            429 => Self::RateLimited { retry_after: None },
            400..=499 => Self::client_error(status, message),
            500..=599 => Self::server_error(status, message),
            _ => Self::malformed_output(message),
        }
    }

    /// Whether the retry layer may attempt this operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout | Self::Network { .. } | Self::ServerError { .. }
        )
    }

    /// Whether this is a transport-level failure eligible for the fast
    /// network retry tier.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Whether this failure must abort the whole pipeline rather than fail
    /// a single step.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidAuth { .. } | Self::InvalidConfig { .. } | Self::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ProviderError::from_status(401, "no"),
            ProviderError::InvalidAuth { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(403, "no"),
            ProviderError::InvalidAuth { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(408, "slow"),
            ProviderError::Timeout
        ));
        assert!(matches!(
            ProviderError::from_status(429, "busy"),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(404, "gone"),
            ProviderError::ClientError { status: 404, .. }
        ));
        assert!(matches!(
            ProviderError::from_status(503, "down"),
            ProviderError::ServerError { status: 503, .. }
        ));
    }

    #[test]
    fn test_retryability() {
        assert!(ProviderError::rate_limited(None).is_retryable());
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::network("refused").is_retryable());
        assert!(ProviderError::server_error(500, "boom").is_retryable());

        assert!(!ProviderError::client_error(404, "gone").is_retryable());
        assert!(!ProviderError::invalid_auth("bad key").is_retryable());
        assert!(!ProviderError::EmptyInput.is_retryable());
        assert!(!ProviderError::Cancelled.is_retryable());
    }

    #[test]
    fn test_network_tier_classification() {
        assert!(ProviderError::network("reset").is_network());
        assert!(!ProviderError::Timeout.is_network());
        assert!(!ProviderError::server_error(502, "bad gateway").is_network());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ProviderError::invalid_auth("bad key").is_fatal());
        assert!(ProviderError::invalid_config("no base url").is_fatal());
        assert!(ProviderError::Cancelled.is_fatal());
        assert!(!ProviderError::Timeout.is_fatal());
        assert!(!ProviderError::malformed_output("no markers").is_fatal());
    }

    #[test]
    fn test_user_facing_messages_are_short() {
        assert_eq!(ProviderError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            ProviderError::invalid_auth("token expired at ...").to_string(),
            "Invalid API key"
        );
        assert_eq!(ProviderError::Cancelled.to_string(), "Operation cancelled");
    }
}
