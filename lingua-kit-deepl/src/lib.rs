//! DeepL and DeepLX providers for lingua-kit.
//!
//! Two backends share this crate: the official DeepL REST API
//! ([`DeepLProvider`]) and self-hosted DeepLX gateways
//! ([`DeepLxProvider`]), which mimic DeepL through a simpler JSON
//! endpoint. Both translate raw text (no prompt templates) and estimate
//! token usage since neither API reports tokens.
//!
//! Like every lingua-kit provider, these perform a single HTTP call per
//! request and leave retrying to the orchestrator.

pub mod deepl;
pub mod deeplx;
pub mod lang;

pub use deepl::{DeepLProvider, DeepLSettings};
pub use deeplx::{DeepLxProvider, DeepLxSettings};
