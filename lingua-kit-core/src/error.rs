use lingua_kit_provider::ProviderError;
use thiserror::Error;

/// Errors surfaced by the translation engine.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The configuration failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// The offending field and what is wrong with it
        message: String,
    },

    /// The input document cannot be processed.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What is wrong with the input
        message: String,
    },

    /// A pipeline step exhausted its retries on a recoverable failure.
    /// Group-level; the repair loop compensates instead of failing the
    /// document.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        /// Name of the failing step
        step: String,
        /// The final provider error
        #[source]
        source: ProviderError,
    },

    /// A fatal provider failure (bad credentials, bad configuration).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The document's cancellation signal fired.
    #[error("Operation cancelled")]
    Cancelled,
}

impl TranslateError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn step_failed(step: impl Into<String>, source: ProviderError) -> Self {
        Self::StepFailed {
            step: step.into(),
            source,
        }
    }

    /// Whether this error must abort the whole document. Step failures are
    /// not fatal; the repair loop retries the affected nodes.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidConfig { .. } | Self::InvalidInput { .. } | Self::Cancelled => true,
            Self::Provider(e) => e.is_fatal(),
            Self::StepFailed { .. } => false,
        }
    }

    /// Process exit code for the external CLI: 1 configuration, 2 input,
    /// 130 cancelled, 3 translation failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } => 1,
            Self::InvalidInput { .. } => 2,
            Self::Cancelled => 130,
            Self::Provider(ProviderError::Cancelled) => 130,
            Self::Provider(ProviderError::InvalidConfig { .. }) => 1,
            Self::StepFailed { .. } | Self::Provider(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(TranslateError::invalid_config("x").exit_code(), 1);
        assert_eq!(TranslateError::invalid_input("x").exit_code(), 2);
        assert_eq!(TranslateError::Cancelled.exit_code(), 130);
        assert_eq!(
            TranslateError::step_failed("initial", ProviderError::Timeout).exit_code(),
            3
        );
        assert_eq!(
            TranslateError::Provider(ProviderError::invalid_auth("bad")).exit_code(),
            3
        );
    }

    #[test]
    fn test_fatality() {
        assert!(TranslateError::Cancelled.is_fatal());
        assert!(TranslateError::invalid_config("x").is_fatal());
        assert!(TranslateError::Provider(ProviderError::invalid_auth("bad")).is_fatal());
        assert!(!TranslateError::Provider(ProviderError::Timeout).is_fatal());
        assert!(!TranslateError::step_failed("initial", ProviderError::Timeout).is_fatal());
    }
}
