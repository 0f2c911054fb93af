//! Test providers shared by the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use lingua_kit_provider::{
    Provider, ProviderError, TokenUsage, TranslationRequest, TranslationResponse,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Prefixes every non-marker line with `[T] `, mimicking a model that
/// translates node contents while reproducing the markers. Records every
/// request and tracks peak concurrency.
pub struct PrefixProvider {
    id: String,
    prefix: String,
    delay: Option<Duration>,
    pub calls: Mutex<Vec<TranslationRequest>>,
    current: AtomicUsize,
    pub peak: AtomicUsize,
}

impl PrefixProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prefix: "[T] ".to_string(),
            delay: None,
            calls: Mutex::new(Vec::new()),
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Adds artificial latency so concurrency is observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Applies the `[T] ` transform to a marker payload (or plain text).
pub fn prefix_transform(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with("@@NODE_") || line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Provider for PrefixProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn translate(
        &self,
        request: TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        self.calls.lock().unwrap().push(request.clone());

        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);

        let text = prefix_transform(&request.text, &self.prefix);
        let chars = request.text.chars().count();
        Ok(TranslationResponse::new(text)
            .with_usage(TokenUsage::estimated_from_chars(chars, chars)))
    }
}

/// Plays back a script of failures before succeeding with the prefix
/// transform. Used for retry tests.
pub struct ScriptedProvider {
    id: String,
    script: Mutex<VecDeque<ProviderError>>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Fails with each scripted error in turn, then succeeds forever.
    pub fn new(id: impl Into<String>, failures: Vec<ProviderError>) -> Self {
        Self {
            id: id.into(),
            script: Mutex::new(failures.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn translate(
        &self,
        request: TranslationRequest,
        _cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.script.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(TranslationResponse::new(prefix_transform(&request.text, "[T] ")))
    }
}

/// Echoes marker payloads but omits one node's markers on the first call,
/// mimicking a model that silently dropped a node. Later calls echo
/// everything.
pub struct DroppingProvider {
    id: String,
    drop_id: u32,
    pub calls: AtomicUsize,
}

impl DroppingProvider {
    pub fn new(id: impl Into<String>, drop_id: u32) -> Self {
        Self {
            id: id.into(),
            drop_id,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for DroppingProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn translate(
        &self,
        request: TranslationRequest,
        _cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let text = if call == 0 {
            let start = format!("@@NODE_START_{}@@", self.drop_id);
            let end = format!("@@NODE_END_{}@@", self.drop_id);
            let mut kept = Vec::new();
            let mut dropping = false;
            for line in request.text.lines() {
                if line == start {
                    dropping = true;
                    continue;
                }
                if line == end {
                    dropping = false;
                    continue;
                }
                if !dropping {
                    kept.push(line);
                }
            }
            kept.join("\n")
        } else {
            request.text.clone()
        };
        Ok(TranslationResponse::new(text))
    }
}

/// Sleeps until cancelled; for cancellation-latency tests.
pub struct StallingProvider {
    id: String,
}

impl StallingProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Provider for StallingProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn translate(
        &self,
        _request: TranslationRequest,
        cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            _ = tokio::time::sleep(Duration::from_secs(60)) => {
                Err(ProviderError::Timeout)
            }
        }
    }
}

/// Always rejects with the given constructor; for fatal-error tests.
pub struct FailingProvider {
    id: String,
    status: u16,
}

impl FailingProvider {
    pub fn auth(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: 401,
        }
    }

    pub fn server_error(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: 500,
        }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn translate(
        &self,
        _request: TranslationRequest,
        _cancel: CancellationToken,
    ) -> Result<TranslationResponse, ProviderError> {
        Err(ProviderError::from_status(self.status, "scripted failure"))
    }
}
