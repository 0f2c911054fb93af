//! Google Cloud Translation (v2) provider for lingua-kit.
//!
//! Translates raw text through the `translate/v2` REST endpoint using an
//! API key. Usage is estimated (the API bills per character and reports no
//! tokens). One HTTP call per request; retrying is the orchestrator's job.

pub mod provider;
pub mod settings;

pub use provider::GoogleProvider;
pub use settings::GoogleSettings;
