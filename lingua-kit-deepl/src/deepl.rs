use crate::lang::to_deepl_lang;
use async_trait::async_trait;
use lingua_kit_provider::{
    Provider, ProviderError, TokenUsage, TranslationRequest, TranslationResponse,
};
use log::trace;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Configuration for the official DeepL API.
#[derive(Debug, Clone)]
pub struct DeepLSettings {
    /// Registry ID of this provider instance.
    pub id: String,

    /// API base URL. Free-tier keys use `https://api-free.deepl.com/v2`.
    pub base_url: String,

    /// DeepL auth key.
    pub api_key: String,
}

impl DeepLSettings {
    pub fn new(id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: "https://api.deepl.com/v2".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Sets the base URL (e.g., the free-tier endpoint).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct DeepLRequest {
    text: Vec<String>,
    source_lang: String,
    target_lang: String,
}

#[derive(Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Deserialize)]
struct DeepLTranslation {
    text: String,
}

/// Official DeepL REST backend.
#[derive(Debug)]
pub struct DeepLProvider {
    settings: DeepLSettings,
    client: reqwest::Client,
}

impl DeepLProvider {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidConfig`] when the API key is empty
    /// or the HTTP client cannot be built.
    pub fn new(settings: DeepLSettings) -> Result<Self, ProviderError> {
        if settings.api_key.trim().is_empty() {
            return Err(ProviderError::invalid_config(format!(
                "provider '{}' has no API key",
                settings.id
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::invalid_config(format!("HTTP client: {e}")))?;
        Ok(Self { settings, client })
    }

    async fn call(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let body = DeepLRequest {
            text: vec![request.text.clone()],
            source_lang: to_deepl_lang(&request.source_lang),
            target_lang: to_deepl_lang(&request.target_lang),
        };

        let url = format!("{}/translate", self.settings.base_url.trim_end_matches('/'));
        let mut builder = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.settings.api_key),
            )
            .json(&body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        trace!("POST {url} {}→{}", body.source_lang, body.target_lang);
        let response = builder.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), detail));
        }

        let parsed: DeepLResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed_output(format!("invalid JSON body: {e}")))?;
        let text = parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| ProviderError::malformed_output("response carried no translations"))?;

        let usage =
            TokenUsage::estimated_from_chars(request.text.chars().count(), text.chars().count());
        Ok(TranslationResponse::new(text).with_usage(usage))
    }
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::network_with_source("request failed", Box::new(error))
    }
}

#[async_trait]
impl Provider for DeepLProvider {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let err = DeepLProvider::new(DeepLSettings::new("deepl", "")).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_request_body_shape() {
        let body = DeepLRequest {
            text: vec!["Hello".to_string()],
            source_lang: to_deepl_lang("en"),
            target_lang: to_deepl_lang("de"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"][0], "Hello");
        assert_eq!(json["source_lang"], "EN-US");
        assert_eq!(json["target_lang"], "DE");
    }

    #[test]
    fn test_response_parsing() {
        let parsed: DeepLResponse =
            serde_json::from_str(r#"{"translations": [{"text": "Hallo"}]}"#).unwrap();
        assert_eq!(parsed.translations[0].text, "Hallo");
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let provider = DeepLProvider::new(DeepLSettings::new("deepl", "key")).unwrap();
        let err = provider
            .translate(
                TranslationRequest::new("   ", "en", "de"),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyInput));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let provider = DeepLProvider::new(DeepLSettings::new("deepl", "key")).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = provider
            .translate(TranslationRequest::new("Hello", "en", "de"), cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Cancelled));
    }
}
