use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    300
}

/// One pipeline step: a provider call with its own prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    /// Step name; later steps reference this step's output as
    /// `{{<name>}}`.
    pub name: String,

    /// Registry ID of the provider this step calls.
    pub provider_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature, `0.0..=2.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Per-attempt deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Prompt template; may reference `{{source}}`, `{{target}}`,
    /// `{{text}}`, this pipeline's earlier step names, and the step's own
    /// `variables`. Empty means "pass the previous step's output through
    /// unchanged" (the raw-provider case).
    #[serde(default)]
    pub prompt_template: String,

    /// Optional system-role instruction for chat backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_role: Option<String>,

    /// Whether this step's output carries reasoning spans to strip.
    #[serde(default)]
    pub reasoning: bool,

    /// Static template variables, lowest precedence.
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl StepConfig {
    /// Minimal step calling the given provider with the given template.
    pub fn new(
        name: impl Into<String>,
        provider_id: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider_id: provider_id.into(),
            model: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
            prompt_template: prompt_template.into(),
            system_role: None,
            reasoning: false,
            variables: HashMap::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// An ordered list of steps; the last step's output is the translation
/// result. Pipeline length is fully data-driven — one step or ten, the
/// executor does not care.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub id: String,

    pub steps: Vec<StepConfig>,

    /// Inputs shorter than this (in characters) run only the first step.
    /// Zero disables fast mode.
    #[serde(default)]
    pub fast_mode_threshold: usize,
}

impl PipelineConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
            fast_mode_threshold: 0,
        }
    }

    /// Appends a step.
    pub fn push_step(mut self, step: StepConfig) -> Self {
        self.steps.push(step);
        self
    }

    /// Sets the fast-mode threshold.
    pub fn with_fast_mode_threshold(mut self, threshold: usize) -> Self {
        self.fast_mode_threshold = threshold;
        self
    }
}
