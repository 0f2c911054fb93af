use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A single translation request.
///
/// For LLM-backed providers `text` carries the fully composed prompt; for
/// dedicated machine-translation backends it carries the raw source text.
/// The request is `Clone` so the retry layer can safely replay it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    /// The text (or prompt) to send to the provider.
    pub text: String,

    /// Source language code (e.g., "en").
    pub source_lang: String,

    /// Target language code (e.g., "zh").
    pub target_lang: String,

    /// Model identifier for backends that distinguish models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature for LLM backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Optional system-role instruction for chat backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Per-attempt deadline. Providers arm this on their transport.
    #[serde(skip)]
    pub timeout: Option<Duration>,

    /// Free-form request metadata (step name, provider ID, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl TranslationRequest {
    /// Creates a request with the given text and language pair.
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            model: None,
            temperature: None,
            max_tokens: None,
            system: None,
            timeout: None,
            metadata: HashMap::new(),
        }
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the output token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the system-role instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Sets the per-attempt deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
