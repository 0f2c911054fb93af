use async_trait::async_trait;
use lingua_kit_provider::{
    Provider, ProviderError, TokenUsage, TranslationRequest, TranslationResponse,
};
use log::trace;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Configuration for a LibreTranslate instance.
#[derive(Debug, Clone)]
pub struct LibreTranslateSettings {
    /// Registry ID of this provider instance.
    pub id: String,

    /// Instance base URL (e.g., "<https://libretranslate.com>").
    pub endpoint: String,

    /// API key, required by some instances.
    pub api_key: Option<String>,
}

impl LibreTranslateSettings {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Serialize)]
struct LibreRequest {
    q: String,
    source: String,
    target: String,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate backend.
#[derive(Debug)]
pub struct LibreTranslateProvider {
    settings: LibreTranslateSettings,
    client: reqwest::Client,
}

impl LibreTranslateProvider {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidConfig`] when the endpoint is empty
    /// or the HTTP client cannot be built.
    pub fn new(settings: LibreTranslateSettings) -> Result<Self, ProviderError> {
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
        let body = LibreRequest {
            q: request.text.clone(),
            source: request.source_lang.to_ascii_lowercase(),
            target: request.target_lang.to_ascii_lowercase(),
            format: "text",
            api_key: self.settings.api_key.clone(),
        };

        let url = format!("{}/translate", self.settings.endpoint.trim_end_matches('/'));
        let mut builder = self.client.post(&url).json(&body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        trace!("POST {url} {}→{}", body.source, body.target);
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::network_with_source("request failed", Box::new(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), detail));
        }

        let parsed: LibreResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed_output(format!("invalid JSON body: {e}")))?;

        let usage = TokenUsage::estimated_from_chars(
            request.text.chars().count(),
            parsed.translated_text.chars().count(),
        );
        Ok(TranslationResponse::new(parsed.translated_text).with_usage(usage))
    }
}

#[async_trait]
impl Provider for LibreTranslateProvider {
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
