use crate::api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::settings::OpenAiCompatibleSettings;
use async_trait::async_trait;
use lingua_kit_provider::{
    Provider, ProviderError, TokenUsage, TranslationRequest, TranslationResponse,
};
use log::trace;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Chat-completions backend for LLM translation steps.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    settings: OpenAiCompatibleSettings,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidConfig`] when the base URL is empty
    /// or the HTTP client cannot be built.
    pub fn new(settings: OpenAiCompatibleSettings) -> Result<Self, ProviderError> {
        if settings.base_url.trim().is_empty() {
            return Err(ProviderError::invalid_config(format!(
                "provider '{}' has no base URL",
                settings.id
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::invalid_config(format!("HTTP client: {e}")))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Assembles the chat request body for one translation request.
    fn build_body(&self, request: &TranslationRequest) -> Result<ChatCompletionRequest, ProviderError> {
        let model = request
            .model
            .clone()
            .or_else(|| self.settings.model.clone())
            .ok_or_else(|| {
                ProviderError::invalid_config(format!(
                    "provider '{}' has no model configured",
                    self.settings.id
                ))
            })?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.text.clone(),
        });

        Ok(ChatCompletionRequest {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        })
    }

    fn map_transport_error(error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::network_with_source(
                if error.is_connect() {
                    "connection failed"
                } else {
                    "request failed"
                },
                Box::new(error),
            )
        }
    }

    async fn call(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let body = self.build_body(request)?;
        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = &self.settings.api_key {
            builder = builder.bearer_auth(api_key);
        }
        for (key, value) in &self.settings.headers {
            builder = builder.header(key, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        trace!("POST {} model={}", self.endpoint(), body.model);
        let response = builder.send().await.map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(&response);
            let detail = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => ProviderError::rate_limited(retry_after),
                code => ProviderError::from_status(code, detail),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed_output(format!("invalid JSON body: {e}")))?;
        extract_response(parsed, request.text.chars().count())
    }
}

/// Pulls the translated text and usage out of a parsed chat response.
fn extract_response(
    parsed: ChatCompletionResponse,
    prompt_chars: usize,
) -> Result<TranslationResponse, ProviderError> {
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::malformed_output("response carried no choices"))?;

    let usage = match parsed.usage {
        Some(usage) => TokenUsage::new(
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
        ),
        None => TokenUsage::estimated_from_chars(prompt_chars, text.chars().count()),
    };

    let mut response = TranslationResponse::new(text).with_usage(usage);
    if let Some(model) = parsed.model {
        response = response.with_metadata("model", model);
    }
    Ok(response)
}

fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn id(&self) -> &str {
        &self.settings.id
    }

    fn stream_only(&self) -> bool {
        self.settings.stream_only
    }

    async fn translate(
        &self,
        request: TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        if request.text.trim().is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        // Dropping the in-flight future aborts the HTTP request.
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

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(
            OpenAiCompatibleSettings::new("openai")
                .with_api_key("test-key")
                .with_model("gpt-4o-mini"),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_missing_base_url() {
        let err = OpenAiCompatibleProvider::new(
            OpenAiCompatibleSettings::new("openai").with_base_url(""),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = OpenAiCompatibleProvider::new(
            OpenAiCompatibleSettings::new("openai")
                .with_base_url("https://api.openai.com/v1/")
                .with_model("gpt-4o-mini"),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_body_uses_request_model_over_default() {
        let request = TranslationRequest::new("Translate this", "en", "de").with_model("gpt-4o");
        let body = provider().build_body(&request).unwrap();
        assert_eq!(body.model, "gpt-4o");
    }

    #[test]
    fn test_body_falls_back_to_default_model() {
        let request = TranslationRequest::new("Translate this", "en", "de");
        let body = provider().build_body(&request).unwrap();
        assert_eq!(body.model, "gpt-4o-mini");
    }

    #[test]
    fn test_body_without_any_model_is_invalid_config() {
        let provider =
            OpenAiCompatibleProvider::new(OpenAiCompatibleSettings::new("openai")).unwrap();
        let err = provider
            .build_body(&TranslationRequest::new("hi", "en", "de"))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_body_includes_system_message_first() {
        let request = TranslationRequest::new("Translate this", "en", "de")
            .with_system("You are a translator.")
            .with_temperature(0.2)
            .with_max_tokens(512);
        let body = provider().build_body(&request).unwrap();

        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].role, "user");
        assert_eq!(body.messages[1].content, "Translate this");
        assert_eq!(body.temperature, Some(0.2));
        assert_eq!(body.max_tokens, Some(512));
    }

    #[test]
    fn test_extract_response_reads_first_choice_and_usage() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"content": "Hallo Welt"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4},
                "model": "gpt-4o-mini"
            }"#,
        )
        .unwrap();

        let response = extract_response(parsed, 11).unwrap();
        assert_eq!(response.text, "Hallo Welt");
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 4);
        assert_eq!(response.metadata.get("model").map(String::as_str), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_extract_response_estimates_usage_when_absent() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "Hallo"}}], "usage": null, "model": null}"#,
        )
        .unwrap();

        let response = extract_response(parsed, 100).unwrap();
        assert_eq!(response.usage.input_tokens, 30);
    }

    #[test]
    fn test_extract_response_without_choices_is_malformed() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [], "usage": null, "model": null}"#).unwrap();
        let err = extract_response(parsed, 5).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let err = provider()
            .translate(
                TranslationRequest::new("  \n ", "en", "de"),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyInput));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = provider()
            .translate(TranslationRequest::new("Hello", "en", "de"), cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Cancelled));
    }
}
