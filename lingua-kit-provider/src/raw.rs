use crate::error::ProviderError;
use crate::provider::Provider;
use crate::request::TranslationRequest;
use crate::response::TranslationResponse;
use crate::usage::TokenUsage;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Echo backend for the `raw` provider kind.
///
/// Returns its input unchanged (markers included), which makes it the
/// identity element of any pipeline: plugged into a full run it leaves
/// translatable text untouched after merge-back. Used for wiring tests and
/// dry runs. Usage is estimated since there is no model behind it.
pub struct RawProvider {
    id: String,
}

impl RawProvider {
    pub fn new() -> Self {
        Self {
            id: "raw".to_string(),
        }
    }

    /// An echo provider registered under a custom ID.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for RawProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for RawProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn translate(
        &self,
        request: TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        if request.text.trim().is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        let chars = request.text.chars().count();
        Ok(TranslationResponse::new(request.text)
            .with_usage(TokenUsage::estimated_from_chars(chars, chars)))
    }
}
