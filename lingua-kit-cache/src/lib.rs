//! Translation cache for lingua-kit.
//!
//! The engine caches at **step granularity**: the output of every pipeline
//! step is stored under a key derived from the language pair, pipeline ID,
//! step name, and the exact step input. A partial rerun therefore reuses
//! every step that already completed, and translating the same document
//! twice with a warm cache issues zero provider calls.
//!
//! Keys are content-addressed (SHA-256, lower hex); collisions are treated
//! as identity. The cache is optional — [`NoopCache`] is a valid
//! implementation — and a miss or read error never fails the pipeline.
//!
//! ## On-disk layout
//!
//! [`FilesystemCache`] stores one JSON file per entry under its cache
//! directory, filename = hex digest of the key:
//!
//! ```text
//! cache_dir/
//! ├── 6b86b273ff34fce1...9b.json
//! └── d4735e3a265e16ee...2c.json
//! ```

pub mod entry;
pub mod error;
pub mod filesystem;
pub mod key;
pub mod memory;
pub mod noop;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use filesystem::FilesystemCache;
pub use key::cache_key;
pub use memory::MemoryCache;
pub use noop::NoopCache;

use async_trait::async_trait;

/// Keyed persistence for step outputs.
///
/// Implementations must be safe for concurrent calls. Writes are durable
/// before `set` returns; reads refresh the entry's `accessed_at` on a
/// best-effort basis.
#[async_trait]
pub trait TranslationCache: Send + Sync {
    /// Looks up a key. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a value under a key, replacing any existing entry.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removes every entry.
    async fn clear(&self) -> Result<(), CacheError>;
}
