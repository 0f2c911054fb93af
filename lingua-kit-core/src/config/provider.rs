use crate::marker::reasoning::default_reasoning_tags;
use lingua_kit_provider::TokenUsage;
use serde::{Deserialize, Serialize};

/// The backend family a configured provider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Openai,
    Deepl,
    Deeplx,
    Google,
    Libretranslate,
    Raw,
}

/// Configuration for one provider instance, keyed by provider ID in
/// [`Settings::providers`](crate::config::Settings::providers).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub kind: ProviderKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Price per million input tokens, in `price_unit`.
    #[serde(default)]
    pub price_input_per_m_tokens: f64,

    /// Price per million output tokens, in `price_unit`.
    #[serde(default)]
    pub price_output_per_m_tokens: f64,

    #[serde(default = "default_price_unit")]
    pub price_unit: String,

    /// Whether the model emits reasoning spans that must be stripped.
    #[serde(default)]
    pub reasoning: bool,

    /// Tag names delimiting reasoning spans.
    #[serde(default = "default_reasoning_tags")]
    pub reasoning_tags: Vec<String>,

    /// Whether the backend only supports a streaming transport.
    #[serde(default)]
    pub stream_only: bool,
}

fn default_price_unit() -> String {
    "USD".to_string()
}

impl ProviderSettings {
    /// Minimal settings for the given kind.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            base_url: None,
            api_key: None,
            model: None,
            max_input_tokens: None,
            max_output_tokens: None,
            price_input_per_m_tokens: 0.0,
            price_output_per_m_tokens: 0.0,
            price_unit: default_price_unit(),
            reasoning: false,
            reasoning_tags: default_reasoning_tags(),
            stream_only: false,
        }
    }

    /// Estimated cost of the given usage in `price_unit`.
    pub fn estimated_cost(&self, usage: &TokenUsage) -> f64 {
        let input = usage.input_tokens as f64 / 1_000_000.0 * self.price_input_per_m_tokens;
        let output = usage.output_tokens as f64 / 1_000_000.0 * self.price_output_per_m_tokens;
        input + output
    }
}
