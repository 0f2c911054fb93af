use crate::chunk::{Chunk, chunk_markdown};
use crate::config::{PipelineConfig, ProviderSettings};
use crate::document::Document;
use crate::error::TranslateError;
use crate::marker::protect::{ProtectedRegions, protect_content, restore_content};
use crate::node::TextNode;
use crate::pipeline::PipelineExecutor;
use crate::progress::{ProgressEmitter, ProgressEvent, TranslationSummary};
use crate::scheduler::Scheduler;
use crate::translator::merge::render_node;
use crate::translator::node::NodeTranslator;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// A translated document plus its accounting.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub document: Document,
    pub summary: TranslationSummary,
}

/// How one translatable block decomposes into chunks and nodes, kept so
/// the block can be reassembled in place.
struct BlockPlan {
    block_index: usize,
    chunks: Vec<Chunk>,
    /// Node ID per chunk; `None` for protected chunks.
    node_ids: Vec<Option<u32>>,
    regions: ProtectedRegions,
}

/// The document-level façade: protect, extract, translate, render,
/// restore, report.
pub struct DocumentTranslator {
    executor: Arc<PipelineExecutor>,
    scheduler: Arc<Scheduler>,
    pipeline: PipelineConfig,
    progress: ProgressEmitter,
    min_split_size: usize,
    max_split_size: usize,
    max_retries: u32,
    retry_failed_parts: bool,
    pricing: Option<ProviderSettings>,
}

impl DocumentTranslator {
    pub fn new(
        executor: Arc<PipelineExecutor>,
        scheduler: Arc<Scheduler>,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            executor,
            scheduler,
            pipeline,
            progress: ProgressEmitter::disabled(),
            min_split_size: 100,
            max_split_size: 1000,
            max_retries: 3,
            retry_failed_parts: true,
            pricing: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressEmitter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_chunk_sizes(mut self, min_split_size: usize, max_split_size: usize) -> Self {
        self.min_split_size = min_split_size;
        self.max_split_size = max_split_size;
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

    /// Enables cost estimation in the completion summary.
    pub fn with_pricing(mut self, pricing: ProviderSettings) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Translates a document.
    ///
    /// Non-translatable blocks pass through byte-identical; protected
    /// regions are restored verbatim; nodes that stay untranslated after
    /// the repair loop keep their original text. Empty or whitespace-only
    /// documents short-circuit with zero provider calls.
    pub async fn translate(
        &self,
        document: Document,
        cancel: &CancellationToken,
    ) -> Result<DocumentReport, TranslateError> {
        let _doc_permit = self.scheduler.acquire_document(cancel).await?;
        let started = Instant::now();
        let doc_id = document.id.clone();

        let (plans, mut nodes) = self.plan_blocks(&document);

        let total_chars: usize = nodes.iter().map(|n| n.original_text.chars().count()).sum();
        self.progress
            .emit_guaranteed(ProgressEvent::StartDocument {
                doc_id: doc_id.clone(),
                total_nodes: nodes.len(),
                total_chars,
            })
            .await;

        if nodes.is_empty() {
            let summary = TranslationSummary {
                elapsed_ms: started.elapsed().as_millis() as u64,
                ..TranslationSummary::default()
            };
            self.progress
                .emit_guaranteed(ProgressEvent::CompleteDocument {
                    doc_id,
                    summary: summary.clone(),
                })
                .await;
            return Ok(DocumentReport { document, summary });
        }

        let node_translator = NodeTranslator::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.scheduler),
        )
        .with_progress(self.progress.clone())
        .with_chunk_size(self.max_split_size)
        .with_max_retries(self.max_retries)
        .with_retry_failed_parts(self.retry_failed_parts);

        let outcome = node_translator
            .translate_nodes(&doc_id, &mut nodes, &self.pipeline, cancel)
            .await?;

        let mut document = document;
        for plan in &plans {
            let mut rendered = String::new();
            for (chunk_index, chunk) in plan.chunks.iter().enumerate() {
                match plan.node_ids[chunk_index] {
                    Some(id) => rendered.push_str(&render_node(&nodes[id as usize])),
                    None => rendered.push_str(&chunk.text),
                }
            }
            document.blocks[plan.block_index].translated =
                Some(restore_content(&rendered, &plan.regions));
        }

        let summary = TranslationSummary {
            total_nodes: nodes.len(),
            translated_nodes: outcome.translated,
            failed_nodes: outcome.failed.len(),
            skipped_nodes: outcome.skipped,
            usage: outcome.usage,
            estimated_cost: self
                .pricing
                .as_ref()
                .map(|pricing| pricing.estimated_cost(&outcome.usage)),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        self.progress
            .emit_guaranteed(ProgressEvent::CompleteDocument {
                doc_id,
                summary: summary.clone(),
            })
            .await;

        Ok(DocumentReport { document, summary })
    }

    /// Protects and chunks every translatable block, assigning dense node
    /// IDs in discovery order.
    fn plan_blocks(&self, document: &Document) -> (Vec<BlockPlan>, Vec<TextNode>) {
        let mut plans = Vec::new();
        let mut nodes: Vec<TextNode> = Vec::new();

        for (block_index, block) in document.blocks.iter().enumerate() {
            if !block.translatable || block.content.trim().is_empty() {
                continue;
            }

            let (protected, regions) = protect_content(&block.content);
            let chunks = chunk_markdown(&protected, self.min_split_size, self.max_split_size);
            let mut node_ids = Vec::with_capacity(chunks.len());
            for (chunk_index, chunk) in chunks.iter().enumerate() {
                if chunk.need_translate && !chunk.text.trim().is_empty() {
                    let id = nodes.len() as u32;
                    nodes.push(TextNode::from_raw(
                        id,
                        &chunk.text,
                        format!("block:{block_index}/chunk:{chunk_index}"),
                    ));
                    node_ids.push(Some(id));
                } else {
                    node_ids.push(None);
                }
            }
            plans.push(BlockPlan {
                block_index,
                chunks,
                node_ids,
                regions,
            });
        }

        (plans, nodes)
    }
}
