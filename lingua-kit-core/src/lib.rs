//! Core translation engine for lingua-kit.
//!
//! Given a document parsed into typed blocks by an external format
//! processor, this crate:
//!
//! 1. protects non-translatable regions (code, style, script, anchors,
//!    comments) behind opaque sentinels,
//! 2. chunks and groups translatable text under a character budget,
//! 3. drives each group through an ordered, configurable sequence of
//!    provider steps with `{{var}}` substitution between steps,
//! 4. schedules groups concurrently under bounded semaphores with
//!    cooperative cancellation, two-tier retries, and step-level caching,
//! 5. parses marker-wrapped provider output back into per-node
//!    translations, and
//! 6. re-translates only the nodes the model dropped, with neighboring
//!    nodes as context, before merging everything back fail-open.
//!
//! Format parsing/rendering, provider transports, CLI, and progress
//! rendering live outside this crate; it consumes providers through
//! [`lingua_kit_provider::Provider`] and emits typed
//! [`progress::ProgressEvent`]s.

pub mod chunk;
pub mod config;
pub mod document;
pub mod error;
pub mod marker;
pub mod node;
pub mod pipeline;
pub mod progress;
pub mod scheduler;
pub mod template;
pub mod translator;

pub use config::{PipelineConfig, ProviderKind, ProviderSettings, Settings, StepConfig};
pub use document::{Block, BlockKind, Document, DocumentFormat};
pub use error::TranslateError;
pub use node::{GroupMember, NodeGroup, TextNode};
pub use pipeline::{PipelineExecutor, PipelineRun, StepReport};
pub use progress::{NodeStatus, ProgressEmitter, ProgressEvent, TranslationSummary};
pub use scheduler::Scheduler;
pub use translator::{DocumentReport, DocumentTranslator, NodeOutcome, NodeTranslator};
