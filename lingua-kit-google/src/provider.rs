use crate::settings::GoogleSettings;
use async_trait::async_trait;
use lingua_kit_provider::{
    Provider, ProviderError, TokenUsage, TranslationRequest, TranslationResponse,
};
use log::trace;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

#[derive(Serialize)]
struct GoogleRequest {
    q: String,
    source: String,
    target: String,
    format: &'static str,
}

#[derive(Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Deserialize)]
struct GoogleData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Deserialize)]
struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Google Cloud Translation v2 backend.
#[derive(Debug)]
pub struct GoogleProvider {
    settings: GoogleSettings,
    client: reqwest::Client,
}

impl GoogleProvider {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidConfig`] when the API key is empty
    /// or the HTTP client cannot be built.
    pub fn new(settings: GoogleSettings) -> Result<Self, ProviderError> {
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
        let body = GoogleRequest {
            q: request.text.clone(),
            source: request.source_lang.to_ascii_lowercase(),
            target: request.target_lang.to_ascii_lowercase(),
            format: "text",
        };

        let mut builder = self
            .client
            .post(&self.settings.base_url)
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        trace!("POST {} {}→{}", self.settings.base_url, body.source, body.target);
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

        let parsed: GoogleResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed_output(format!("invalid JSON body: {e}")))?;
        let text = parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::malformed_output("response carried no translations"))?;

        let usage =
            TokenUsage::estimated_from_chars(request.text.chars().count(), text.chars().count());
        Ok(TranslationResponse::new(text).with_usage(usage))
    }
}

#[async_trait]
impl Provider for GoogleProvider {
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
        let err = GoogleProvider::new(GoogleSettings::new("google", " ")).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GoogleRequest {
            q: "Hello".to_string(),
            source: "en".to_string(),
            target: "de".to_string(),
            format: "text",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["q"], "Hello");
        assert_eq!(json["format"], "text");
    }

    #[test]
    fn test_response_parsing() {
        let parsed: GoogleResponse = serde_json::from_str(
            r#"{"data": {"translations": [{"translatedText": "Hallo"}]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.data.translations[0].translated_text, "Hallo");
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let provider = GoogleProvider::new(GoogleSettings::new("google", "key")).unwrap();
        let err = provider
            .translate(
                TranslationRequest::new("", "en", "de"),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyInput));
    }
}
