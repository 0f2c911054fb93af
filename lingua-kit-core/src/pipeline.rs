//! The step pipeline executor.
//!
//! Runs one input through an ordered list of provider steps. Each step
//! composes its prompt from `{{var}}` substitution over the step's static
//! variables, the language pair, the original input (`{{text}}`), and
//! every earlier step's output (`{{<step-name>}}`). Step outputs are
//! cached individually so a partial rerun reuses whatever already
//! completed.

use crate::config::{PipelineConfig, StepConfig};
use crate::error::TranslateError;
use crate::marker::reasoning::strip_reasoning;
use crate::template::render_template;
use lingua_kit_cache::{TranslationCache, cache_key};
use lingua_kit_provider::{ProviderError, ProviderRegistry, TokenUsage, TranslationRequest};
use lingua_kit_provider_utils::{RetryPolicy, retry_with_policy};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Accounting for one executed (or cache-served) step.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: String,
    pub usage: TokenUsage,
    pub duration: Duration,
    pub cached: bool,
}

/// The result of running a pipeline on one input.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The last step's output.
    pub text: String,
    /// Usage summed over all non-cached steps.
    pub usage: TokenUsage,
    pub steps: Vec<StepReport>,
}

/// Drives inputs through a pipeline's steps with caching, retries, and
/// per-step deadlines.
pub struct PipelineExecutor {
    registry: Arc<ProviderRegistry>,
    cache: Arc<dyn TranslationCache>,
    policy: RetryPolicy,
    source_lang: String,
    target_lang: String,
    filter_reasoning: bool,
    reasoning_tags: Vec<String>,
    /// Bounds concurrent provider calls across all in-flight groups.
    call_permits: Option<Arc<Semaphore>>,
}

impl PipelineExecutor {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        cache: Arc<dyn TranslationCache>,
        policy: RetryPolicy,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            cache,
            policy,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            filter_reasoning: true,
            reasoning_tags: crate::marker::reasoning::default_reasoning_tags(),
            call_permits: None,
        }
    }

    /// Disables or enables reasoning stripping globally.
    pub fn with_filter_reasoning(mut self, filter: bool) -> Self {
        self.filter_reasoning = filter;
        self
    }

    /// Replaces the reasoning tag set.
    pub fn with_reasoning_tags(mut self, tags: Vec<String>) -> Self {
        self.reasoning_tags = tags;
        self
    }

    /// Bounds concurrent provider calls with a shared semaphore.
    pub fn with_call_permits(mut self, permits: Arc<Semaphore>) -> Self {
        self.call_permits = Some(permits);
        self
    }

    /// Runs `input` through the pipeline.
    ///
    /// Fast mode: when the pipeline has a threshold and the input is
    /// shorter, only the first step runs.
    ///
    /// # Errors
    ///
    /// Recoverable step failures surface as
    /// [`TranslateError::StepFailed`]; fatal provider errors and
    /// cancellation propagate untouched.
    pub async fn run(
        &self,
        pipeline: &PipelineConfig,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<PipelineRun, TranslateError> {
        if input.trim().is_empty() {
            return Ok(PipelineRun {
                text: String::new(),
                usage: TokenUsage::default(),
                steps: Vec::new(),
            });
        }

        let fast = pipeline.fast_mode_threshold > 0
            && pipeline.steps.len() > 1
            && input.chars().count() < pipeline.fast_mode_threshold;
        let steps: &[StepConfig] = if fast {
            debug!(
                "fast mode: input below {} chars, running only '{}'",
                pipeline.fast_mode_threshold, pipeline.steps[0].name
            );
            &pipeline.steps[..1]
        } else {
            &pipeline.steps
        };

        let mut outputs: HashMap<String, String> = HashMap::new();
        outputs.insert("source".to_string(), self.source_lang.clone());
        outputs.insert("target".to_string(), self.target_lang.clone());
        outputs.insert("text".to_string(), input.to_string());

        let mut current = input.to_string();
        let mut total_usage = TokenUsage::default();
        let mut reports = Vec::with_capacity(steps.len());

        for step in steps {
            if cancel.is_cancelled() {
                return Err(TranslateError::Cancelled);
            }

            let prompt = if step.prompt_template.is_empty() {
                current.clone()
            } else {
                let mut vars = step.variables.clone();
                vars.extend(outputs.iter().map(|(k, v)| (k.clone(), v.clone())));
                render_template(&step.prompt_template, &vars)
            };

            let key = cache_key(
                &self.source_lang,
                &self.target_lang,
                &pipeline.id,
                &step.name,
                &prompt,
            );

            let started = Instant::now();
            let (mut text, usage, cached) = match self.cache_lookup(&key).await {
                Some(hit) => (hit, TokenUsage::default(), true),
                None => {
                    let response = self.call_step(step, &prompt, cancel).await?;
                    (response.text, response.usage, false)
                }
            };

            if step.reasoning && self.filter_reasoning {
                text = strip_reasoning(&text, &self.reasoning_tags);
            }

            if !cached && let Err(e) = self.cache.set(&key, &text).await {
                warn!("cache write failed for step '{}': {e}", step.name);
            }

            total_usage.add(usage);
            reports.push(StepReport {
                name: step.name.clone(),
                usage,
                duration: started.elapsed(),
                cached,
            });
            outputs.insert(step.name.clone(), text.clone());
            current = text;
        }

        Ok(PipelineRun {
            text: current,
            usage: total_usage,
            steps: reports,
        })
    }

    async fn cache_lookup(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                // A broken cache degrades to a miss, never to a failure.
                debug!("cache read failed: {e}");
                None
            }
        }
    }

    async fn call_step(
        &self,
        step: &StepConfig,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<lingua_kit_provider::TranslationResponse, TranslateError> {
        let provider = self.registry.get(&step.provider_id)?;

        let mut request = TranslationRequest::new(prompt, &self.source_lang, &self.target_lang)
            .with_timeout(step.timeout())
            .with_metadata("step", &step.name)
            .with_metadata("providerId", &step.provider_id);
        if let Some(model) = &step.model {
            request = request.with_model(model);
        }
        if let Some(temperature) = step.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = step.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(system) = &step.system_role {
            request = request.with_system(system);
        }

        let timeout = step.timeout();
        let result = retry_with_policy(&self.policy, cancel, |attempt| {
            let request = request.clone();
            let provider = provider.clone();
            let cancel = cancel.clone();
            let permits = self.call_permits.clone();
            async move {
                let _permit = match &permits {
                    Some(semaphore) => match semaphore.clone().acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => return Err(ProviderError::Cancelled),
                    },
                    None => None,
                };
                if attempt > 0 {
                    debug!("retrying provider call (attempt {attempt})");
                }
                match tokio::time::timeout(timeout, provider.translate(request, cancel)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout),
                }
            }
        })
        .await;

        result.map_err(|error| {
            if matches!(error, ProviderError::Cancelled) {
                TranslateError::Cancelled
            } else if error.is_fatal() {
                TranslateError::Provider(error)
            } else {
                TranslateError::step_failed(&step.name, error)
            }
        })
    }
}
