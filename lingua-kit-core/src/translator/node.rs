use crate::chunk::group_members;
use crate::config::PipelineConfig;
use crate::error::TranslateError;
use crate::marker::{parse_group_output, wrap_group};
use crate::node::{GroupMember, TextNode};
use crate::pipeline::PipelineExecutor;
use crate::progress::{NodeStatus, ProgressEmitter, ProgressEvent};
use crate::scheduler::Scheduler;
use lingua_kit_provider::TokenUsage;
use log::warn;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Result of translating one node array.
#[derive(Debug, Clone)]
pub struct NodeOutcome {
    /// Nodes that ended up with a translation.
    pub translated: usize,

    /// Nodes still untranslated after the repair loop. They keep their
    /// original text in the rendered document.
    pub failed: Vec<u32>,

    /// Whitespace-only nodes that were never sent.
    pub skipped: usize,

    /// Usage summed over every provider call, repair passes included.
    pub usage: TokenUsage,
}

/// Translates a flat node array: groups nodes, runs each group through
/// the pipeline under the marker protocol, merges translations by stable
/// ID, and re-translates only the nodes the model dropped.
pub struct NodeTranslator {
    executor: Arc<PipelineExecutor>,
    scheduler: Arc<Scheduler>,
    progress: ProgressEmitter,
    /// Character budget for one group (one provider call).
    chunk_size: usize,
    /// Repair passes after the initial one.
    max_retries: u32,
    retry_failed_parts: bool,
}

impl NodeTranslator {
    pub fn new(executor: Arc<PipelineExecutor>, scheduler: Arc<Scheduler>) -> Self {
        Self {
            executor,
            scheduler,
            progress: ProgressEmitter::disabled(),
            chunk_size: 1000,
            max_retries: 3,
            retry_failed_parts: true,
        }
    }

    pub fn with_progress(mut self, progress: ProgressEmitter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_failed_parts(mut self, retry: bool) -> Self {
        self.retry_failed_parts = retry;
        self
    }

    /// Populates `translated_text` on every node it can; the rest are
    /// reported in the outcome (fail-open — callers render their original
    /// text).
    ///
    /// # Errors
    ///
    /// Only fatal failures (bad credentials/configuration, cancellation)
    /// error out; per-group step failures feed the repair loop instead.
    pub async fn translate_nodes(
        &self,
        doc_id: &str,
        nodes: &mut [TextNode],
        pipeline: &PipelineConfig,
        cancel: &CancellationToken,
    ) -> Result<NodeOutcome, TranslateError> {
        let index_by_id: HashMap<u32, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.global_id, index))
            .collect();

        // Whitespace-only nodes are never sent.
        let targets: Vec<u32> = nodes
            .iter()
            .filter(|n| n.is_translatable())
            .map(|n| n.global_id)
            .collect();
        let skipped = nodes.len() - targets.len();
        for node in nodes.iter().filter(|n| !n.is_translatable()) {
            self.progress.emit(ProgressEvent::NodeDone {
                doc_id: doc_id.to_string(),
                node_id: node.global_id,
                status: NodeStatus::Skipped,
                chars: 0,
                error: None,
            });
        }

        let translations: Arc<Mutex<HashMap<u32, String>>> = Arc::new(Mutex::new(HashMap::new()));
        let mut usage = TokenUsage::default();

        if !targets.is_empty() {
            let mut pending: Vec<u32> = targets.clone();
            let mut attempt = 0u32;

            loop {
                let pass_usage = self
                    .run_pass(doc_id, nodes, &index_by_id, &pending, pipeline, &translations, cancel)
                    .await?;
                usage.add(pass_usage);

                let failed = self.collect_failed(&targets, &translations);
                if failed.is_empty() {
                    break;
                }
                if !self.retry_failed_parts || attempt >= self.max_retries {
                    break;
                }
                attempt += 1;
                pending = expand_with_neighbors(&failed, &targets);
                warn!(
                    "repair pass {attempt}: {} node(s) missing, re-sending {} with context",
                    failed.len(),
                    pending.len()
                );
            }
        }

        // Merge results into the node array and report per node.
        let map = translations.lock().expect("translations lock poisoned");
        let mut translated = 0usize;
        let mut failed = Vec::new();
        for id in &targets {
            let node = &mut nodes[index_by_id[id]];
            match map.get(id) {
                Some(text) => {
                    node.translated_text = text.clone();
                    translated += 1;
                    self.progress.emit(ProgressEvent::NodeDone {
                        doc_id: doc_id.to_string(),
                        node_id: *id,
                        status: NodeStatus::Ok,
                        chars: node.original_text.chars().count(),
                        error: None,
                    });
                }
                None => {
                    failed.push(*id);
                    self.progress.emit(ProgressEvent::NodeDone {
                        doc_id: doc_id.to_string(),
                        node_id: *id,
                        status: NodeStatus::Failed,
                        chars: node.original_text.chars().count(),
                        error: Some("translation missing after retries".to_string()),
                    });
                }
            }
        }

        Ok(NodeOutcome {
            translated,
            failed,
            skipped,
            usage,
        })
    }

    /// Dispatches one pass of groups and merges what parses back.
    #[allow(clippy::too_many_arguments)]
    async fn run_pass(
        &self,
        doc_id: &str,
        nodes: &[TextNode],
        index_by_id: &HashMap<u32, usize>,
        pending: &[u32],
        pipeline: &PipelineConfig,
        translations: &Arc<Mutex<HashMap<u32, String>>>,
        cancel: &CancellationToken,
    ) -> Result<TokenUsage, TranslateError> {
        let members: Vec<GroupMember> = pending
            .iter()
            .map(|id| GroupMember {
                id: *id,
                text: nodes[index_by_id[id]].original_text.clone(),
            })
            .collect();
        let groups = group_members(members, self.chunk_size);

        let tasks: Vec<_> = groups
            .into_iter()
            .map(|group| {
                let executor = Arc::clone(&self.executor);
                let pipeline = pipeline.clone();
                let translations = Arc::clone(translations);
                let progress = self.progress.clone();
                let doc_id = doc_id.to_string();
                let cancel = cancel.clone();
                move || async move {
                    let payload = wrap_group(&group);
                    let run = executor.run(&pipeline, &payload, &cancel).await?;
                    for report in &run.steps {
                        progress.emit(ProgressEvent::StepDone {
                            doc_id: doc_id.clone(),
                            step_name: report.name.clone(),
                            input_tokens: report.usage.input_tokens,
                            output_tokens: report.usage.output_tokens,
                            duration_ms: report.duration.as_millis() as u64,
                        });
                    }

                    let parsed = parse_group_output(&run.text, &group.id_set());
                    {
                        // First translation wins; repair-pass context never
                        // overwrites a node that already succeeded.
                        let mut map = translations.lock().expect("translations lock poisoned");
                        for (id, text) in parsed {
                            map.entry(id).or_insert(text);
                        }
                    }
                    Ok(run.usage)
                }
            })
            .collect();

        let results = self.scheduler.run_groups(tasks, cancel).await;

        let mut usage = TokenUsage::default();
        let mut cancelled = false;
        for result in results {
            match result {
                Ok(group_usage) => usage.add(group_usage),
                Err(TranslateError::Cancelled) => cancelled = true,
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    // Recoverable; the affected nodes stay pending for the
                    // repair loop.
                    warn!("group failed, leaving nodes for repair: {error}");
                }
            }
        }
        if cancelled {
            return Err(TranslateError::Cancelled);
        }
        Ok(usage)
    }

    fn collect_failed(
        &self,
        targets: &[u32],
        translations: &Arc<Mutex<HashMap<u32, String>>>,
    ) -> Vec<u32> {
        let map = translations.lock().expect("translations lock poisoned");
        targets
            .iter()
            .filter(|id| !map.contains_key(id))
            .copied()
            .collect()
    }
}

/// Failed nodes plus their immediate neighbors (in discovery order),
/// deduplicated and sorted. The neighbors give the model context the
/// isolated node lacked.
fn expand_with_neighbors(failed: &[u32], targets: &[u32]) -> Vec<u32> {
    let positions: HashMap<u32, usize> = targets
        .iter()
        .enumerate()
        .map(|(position, id)| (*id, position))
        .collect();

    let mut expanded = BTreeSet::new();
    for id in failed {
        let Some(&position) = positions.get(id) else {
            continue;
        };
        if position > 0 {
            expanded.insert(targets[position - 1]);
        }
        expanded.insert(*id);
        if position + 1 < targets.len() {
            expanded.insert(targets[position + 1]);
        }
    }
    expanded.into_iter().collect()
}
