//! OpenAI-compatible chat provider for lingua-kit.
//!
//! Drives translation pipeline steps over any API that speaks the
//! `/chat/completions` wire format — OpenAI itself, Azure OpenAI, local
//! gateways, and the long tail of compatible inference servers. The step's
//! composed prompt arrives as the user message; an optional system-role
//! instruction rides alongside it.
//!
//! The provider performs exactly one HTTP call per
//! [`translate`](lingua_kit_provider::Provider::translate) invocation:
//! retrying is the orchestrator's job, and any non-2xx status is an error
//! (no body salvage).
//!
//! # Example
//!
//! ```no_run
//! use lingua_kit_openai_compatible::{OpenAiCompatibleProvider, OpenAiCompatibleSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiCompatibleProvider::new(
//!     OpenAiCompatibleSettings::new("openai")
//!         .with_base_url("https://api.openai.com/v1")
//!         .with_api_key("sk-...")
//!         .with_model("gpt-4o-mini"),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod api_types;
pub mod provider;
pub mod settings;

pub use provider::OpenAiCompatibleProvider;
pub use settings::OpenAiCompatibleSettings;
