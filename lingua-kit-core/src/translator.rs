//! The translators: node-level orchestration with the repair loop, merge
//! helpers, and the document-level façade.

mod document;
mod merge;
mod node;

pub use document::{DocumentReport, DocumentTranslator};
pub use merge::{render_node, replace_in_fragment};
pub use node::{NodeOutcome, NodeTranslator};
