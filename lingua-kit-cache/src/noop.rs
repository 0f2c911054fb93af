use crate::{CacheError, TranslationCache};
use async_trait::async_trait;

/// A cache that stores nothing. Every lookup is a miss.
///
/// Valid wherever a cache is optional; the engine behaves identically,
/// just without reuse.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl TranslationCache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
