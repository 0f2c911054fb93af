use crate::deepl::map_transport_error;
use crate::lang::to_deepl_lang;
use async_trait::async_trait;
use lingua_kit_provider::{
    Provider, ProviderError, TokenUsage, TranslationRequest, TranslationResponse,
};
use log::trace;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Configuration for a self-hosted DeepLX gateway.
#[derive(Debug, Clone)]
pub struct DeepLxSettings {
    /// Registry ID of this provider instance.
    pub id: String,

    /// Gateway endpoint (e.g., "<http://localhost:1188/translate>").
    pub endpoint: String,

    /// Optional bearer token.
    pub token: Option<String>,
}

impl DeepLxSettings {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            token: None,
        }
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[derive(Serialize)]
struct DeepLxRequest {
    text: String,
    source_lang: String,
    target_lang: String,
}

#[derive(Deserialize)]
struct DeepLxResponse {
    code: u16,
    data: Option<String>,
}

/// DeepLX gateway backend.
///
/// DeepLX reports its real status in the JSON body's `code` field even on
/// HTTP 200, so both layers are checked.
#[derive(Debug)]
pub struct DeepLxProvider {
    settings: DeepLxSettings,
    client: reqwest::Client,
}

impl DeepLxProvider {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidConfig`] when the endpoint is empty
    /// or the HTTP client cannot be built.
    pub fn new(settings: DeepLxSettings) -> Result<Self, ProviderError> {
        if settings.endpoint.trim().is_empty() {
            return Err(ProviderError::invalid_config(format!(
                "provider '{}' has no endpoint",
                settings.id
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::invalid_config(format!("HTTP client: {e}")))?;
        Ok(Self { settings, client })
    }

    async fn call(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let body = DeepLxRequest {
            text: request.text.clone(),
            source_lang: to_deepl_lang(&request.source_lang),
            target_lang: to_deepl_lang(&request.target_lang),
        };

        let mut builder = self.client.post(&self.settings.endpoint).json(&body);
        if let Some(token) = &self.settings.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        trace!("POST {}", self.settings.endpoint);
        let response = builder.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), detail));
        }

        let parsed: DeepLxResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed_output(format!("invalid JSON body: {e}")))?;
        let text = extract_data(parsed)?;

        let usage =
            TokenUsage::estimated_from_chars(request.text.chars().count(), text.chars().count());
        Ok(TranslationResponse::new(text).with_usage(usage))
    }
}

fn extract_data(parsed: DeepLxResponse) -> Result<String, ProviderError> {
    if parsed.code != 200 {
        return Err(ProviderError::from_status(
            parsed.code,
            format!("gateway body code {}", parsed.code),
        ));
    }
    parsed
        .data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| ProviderError::malformed_output("gateway returned no data"))
}

#[async_trait]
impl Provider for DeepLxProvider {
    fn id(&self) -> &str {
        &self.settings.id
    }

    async fn translate(
        &self,
        request: TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        if request.text.trim().is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.call(&request) => result,
        }
    }
}
