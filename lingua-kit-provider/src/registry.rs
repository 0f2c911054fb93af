use crate::error::ProviderError;
use crate::provider::Provider;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// String-ID lookup for translation backends.
///
/// The registry is populated once at startup, before any document is
/// translated, and treated as immutable afterwards. Pipeline steps select
/// their backend by the `provider_id` in their configuration.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn Provider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own ID. A later registration with the
    /// same ID replaces the earlier one.
    pub fn register(&self, provider: Arc<dyn Provider>) {
        let id = provider.id().to_string();
        self.providers
            .write()
            .expect("provider registry lock poisoned")
            .insert(id, provider);
    }

    /// Looks up a provider by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidConfig`] when no provider is
    /// registered under `id`, listing the known IDs.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Provider>, ProviderError> {
        let providers = self
            .providers
            .read()
            .expect("provider registry lock poisoned");
        providers.get(id).cloned().ok_or_else(|| {
            let mut known: Vec<&str> = providers.keys().map(String::as_str).collect();
            known.sort_unstable();
            ProviderError::invalid_config(format!(
                "unknown provider '{id}' (registered: {})",
                known.join(", ")
            ))
        })
    }

    /// The IDs of all registered providers, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .providers
            .read()
            .expect("provider registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        ids.sort_unstable();
        ids
    }
}
