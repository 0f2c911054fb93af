//! Engine configuration: languages, pipelines, providers, chunking,
//! concurrency, caching, and behavior flags.
//!
//! [`Settings`] deserializes from TOML, picks up provider credentials from
//! the environment, and validates into a ready-to-use form with
//! [`Settings::finalize`].

mod pipeline;
mod provider;

pub use pipeline::{PipelineConfig, StepConfig};
pub use provider::{ProviderKind, ProviderSettings};

use crate::error::TranslateError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_min_split_size() -> usize {
    100
}
fn default_max_split_size() -> usize {
    1000
}
fn default_doc_concurrency() -> usize {
    2
}
fn default_inner_concurrency() -> usize {
    4
}
fn default_max_retries() -> u32 {
    3
}
fn default_network_max_retries() -> u32 {
    5
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_translation_timeout_secs() -> u64 {
    300
}
fn default_auto_save_interval_secs() -> u64 {
    60
}
fn default_use_cache() -> bool {
    true
}
fn default_cache_dir() -> String {
    ".lingua-cache".to_string()
}
fn default_filter_reasoning() -> bool {
    true
}
fn default_retry_failed_parts() -> bool {
    true
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub source_language: String,
    pub target_language: String,

    /// Optional country/style hint passed to prompt templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default)]
    pub pipelines: HashMap<String, PipelineConfig>,

    /// Which pipeline to run.
    pub active_pipeline: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,

    // Chunking
    #[serde(default = "default_min_split_size")]
    pub min_split_size: usize,
    #[serde(default = "default_max_split_size")]
    pub max_split_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens_per_chunk: Option<usize>,

    // Concurrency and retries
    #[serde(default = "default_doc_concurrency")]
    pub doc_concurrency: usize,
    #[serde(default = "default_inner_concurrency")]
    pub inner_concurrency: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_network_max_retries")]
    pub network_max_retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_translation_timeout_secs")]
    pub translation_timeout_secs: u64,
    #[serde(default = "default_auto_save_interval_secs")]
    pub auto_save_interval_secs: u64,

    // Cache
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    // Behavior
    #[serde(default)]
    pub fast_mode_threshold: usize,
    #[serde(default = "default_filter_reasoning")]
    pub filter_reasoning: bool,
    #[serde(default = "default_retry_failed_parts")]
    pub retry_failed_parts: bool,
}

impl Settings {
    /// Parses settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::InvalidConfig`] on malformed TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, TranslateError> {
        toml::from_str(input).map_err(|e| TranslateError::invalid_config(e.to_string()))
    }

    /// Fills provider credentials from the conventional environment
    /// variables, without overwriting values already present:
    /// `OPENAI_API_KEY`, `DEEPL_API_KEY`, `GOOGLE_API_KEY`,
    /// `DEEPLX_ENDPOINT`, `DEEPLX_TOKEN`, `LIBRETRANSLATE_ENDPOINT`,
    /// `LIBRETRANSLATE_API_KEY`.
    pub fn apply_env_overrides(&mut self) {
        for settings in self.providers.values_mut() {
            match settings.kind {
                ProviderKind::Openai => {
                    fill_from_env(&mut settings.api_key, "OPENAI_API_KEY");
                }
                ProviderKind::Deepl => {
                    fill_from_env(&mut settings.api_key, "DEEPL_API_KEY");
                }
                ProviderKind::Deeplx => {
                    fill_from_env(&mut settings.base_url, "DEEPLX_ENDPOINT");
                    fill_from_env(&mut settings.api_key, "DEEPLX_TOKEN");
                }
                ProviderKind::Google => {
                    fill_from_env(&mut settings.api_key, "GOOGLE_API_KEY");
                }
                ProviderKind::Libretranslate => {
                    fill_from_env(&mut settings.base_url, "LIBRETRANSLATE_ENDPOINT");
                    fill_from_env(&mut settings.api_key, "LIBRETRANSLATE_API_KEY");
                }
                ProviderKind::Raw => {}
            }
        }
    }

    /// Validates and normalizes the settings.
    ///
    /// Pipelines without their own fast-mode threshold inherit the
    /// behavior-level one.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::InvalidConfig`] naming the offending
    /// field.
    pub fn finalize(mut self) -> Result<Self, TranslateError> {
        if self.source_language.trim().is_empty() {
            return Err(TranslateError::invalid_config("sourceLanguage is required"));
        }
        if self.target_language.trim().is_empty() {
            return Err(TranslateError::invalid_config("targetLanguage is required"));
        }
        if !self.pipelines.contains_key(&self.active_pipeline) {
            return Err(TranslateError::invalid_config(format!(
                "activePipeline '{}' is not defined",
                self.active_pipeline
            )));
        }
        if self.min_split_size >= self.max_split_size {
            return Err(TranslateError::invalid_config(format!(
                "minSplitSize ({}) must be below maxSplitSize ({})",
                self.min_split_size, self.max_split_size
            )));
        }
        if self.doc_concurrency == 0 || self.inner_concurrency == 0 {
            return Err(TranslateError::invalid_config(
                "docConcurrency and innerConcurrency must be at least 1",
            ));
        }

        for (id, pipeline) in &mut self.pipelines {
            if pipeline.steps.is_empty() {
                return Err(TranslateError::invalid_config(format!(
                    "pipeline '{id}' has no steps"
                )));
            }
            if pipeline.fast_mode_threshold == 0 {
                pipeline.fast_mode_threshold = self.fast_mode_threshold;
            }
            for step in &pipeline.steps {
                if !self.providers.contains_key(&step.provider_id) {
                    return Err(TranslateError::invalid_config(format!(
                        "step '{}' of pipeline '{id}' references unknown provider '{}'",
                        step.name, step.provider_id
                    )));
                }
                if let Some(t) = step.temperature
                    && !(0.0..=2.0).contains(&t)
                {
                    return Err(TranslateError::invalid_config(format!(
                        "step '{}' temperature {t} is outside 0..=2",
                        step.name
                    )));
                }
            }
        }

        Ok(self)
    }

    /// The active pipeline. Call after [`finalize`](Settings::finalize).
    pub fn active_pipeline(&self) -> Option<&PipelineConfig> {
        self.pipelines.get(&self.active_pipeline)
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.is_none()
        && let Ok(value) = std::env::var(var)
        && !value.is_empty()
    {
        *slot = Some(value);
    }
}
