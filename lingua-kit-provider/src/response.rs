use crate::usage::TokenUsage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A provider's answer to a [`TranslationRequest`](crate::TranslationRequest).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    /// The translated (or generated) text.
    pub text: String,

    /// Reported or estimated token usage for the call.
    #[serde(default)]
    pub usage: TokenUsage,

    /// Free-form response metadata (model version, request ID, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl TranslationResponse {
    /// Creates a response with the given text and no usage data.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
            metadata: HashMap::new(),
        }
    }

    /// Sets the usage counts.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
