//! Typed progress events for external trackers.
//!
//! Emission never blocks the translation path: node and step events are
//! fire-and-forget over a bounded channel and are dropped when the
//! consumer lags; start/completion events are awaited so summaries are
//! never lost.

use lingua_kit_provider::TokenUsage;
use log::trace;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Outcome of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Ok,
    Failed,
    Skipped,
}

/// End-of-document accounting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationSummary {
    pub total_nodes: usize,
    pub translated_nodes: usize,
    pub failed_nodes: usize,
    pub skipped_nodes: usize,
    pub usage: TokenUsage,
    /// Estimated cost in the provider's price unit, when pricing is
    /// configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    pub elapsed_ms: u64,
}

/// Events emitted while a document translates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ProgressEvent {
    StartDocument {
        doc_id: String,
        total_nodes: usize,
        total_chars: usize,
    },
    NodeDone {
        doc_id: String,
        node_id: u32,
        status: NodeStatus,
        chars: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    StepDone {
        doc_id: String,
        step_name: String,
        input_tokens: u64,
        output_tokens: u64,
        duration_ms: u64,
    },
    CompleteDocument {
        doc_id: String,
        summary: TranslationSummary,
    },
}

/// Hands events to an external consumer without ever blocking the
/// translators.
#[derive(Clone)]
pub struct ProgressEmitter {
    tx: Option<mpsc::Sender<ProgressEvent>>,
}

impl ProgressEmitter {
    /// A connected emitter/receiver pair with the given buffer capacity.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// An emitter that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Fire-and-forget emission for node/step events. Dropped when the
    /// buffer is full or the consumer is gone.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx
            && let Err(e) = tx.try_send(event)
        {
            trace!("progress event dropped: {e}");
        }
    }

    /// Guaranteed delivery for start/completion events; waits for buffer
    /// space. Only a departed consumer loses the event.
    pub async fn emit_guaranteed(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx
            && let Err(e) = tx.send(event).await
        {
            trace!("progress consumer gone: {e}");
        }
    }
}
