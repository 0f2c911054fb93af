//! LibreTranslate provider for lingua-kit.
//!
//! Translates raw text through a LibreTranslate instance — the public
//! service or a self-hosted one. Usage is estimated (the API reports no
//! tokens). One HTTP call per request; retrying is the orchestrator's job.

pub mod provider;

pub use provider::{LibreTranslateProvider, LibreTranslateSettings};
