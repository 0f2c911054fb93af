use crate::error::ProviderError;
use crate::request::TranslationRequest;
use crate::response::TranslationResponse;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// The contract every translation backend implements.
///
/// The engine drives all backends through this single operation. The
/// contract is deliberately narrow:
///
/// - Implementations must observe `cancel` and the deadline carried in
///   [`TranslationRequest::timeout`], returning [`ProviderError::Cancelled`]
///   or [`ProviderError::Timeout`] promptly.
/// - Implementations must **not** retry internally. Recoverable failures are
///   reported as typed errors and retried by the orchestrator's two-tier
///   policy.
/// - Token counts are reported when the backend exposes them; otherwise an
///   estimate (see [`TokenUsage::estimated_from_chars`]) is acceptable.
///
/// [`TokenUsage::estimated_from_chars`]: crate::TokenUsage::estimated_from_chars
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use lingua_kit_provider::{
///     Provider, ProviderError, TranslationRequest, TranslationResponse,
/// };
/// use tokio_util::sync::CancellationToken;
///
/// struct Uppercase;
///
/// #[async_trait]
/// impl Provider for Uppercase {
///     fn id(&self) -> &str {
///         "uppercase"
///     }
///
///     async fn translate(
///         &self,
///         request: TranslationRequest,
///         _cancel: CancellationToken,
///     ) -> Result<TranslationResponse, ProviderError> {
///         Ok(TranslationResponse::new(request.text.to_uppercase()))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// The registry ID of this provider instance.
    fn id(&self) -> &str;

    /// Whether the backend only supports a streaming transport. The
    /// implementation chooses its transport internally; the engine never
    /// branches on this.
    fn stream_only(&self) -> bool {
        false
    }

    /// Translates one request.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] classifying the failure for the retry
    /// layer. Implementations must return [`ProviderError::EmptyInput`] for
    /// whitespace-only text rather than calling the backend.
    async fn translate(
        &self,
        request: TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError>;
}
