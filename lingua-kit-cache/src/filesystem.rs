use crate::{CacheEntry, CacheError, TranslationCache};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Durable cache: one JSON file per entry under `cache_dir`.
///
/// Filenames are the hex digest of the key (see
/// [`cache_key`](crate::cache_key)), so the layout is flat and
/// content-addressed. Writes go through a temp file and an atomic rename;
/// `accessed_at` is refreshed on read, best-effort.
pub struct FilesystemCache {
    cache_dir: PathBuf,
}

impl FilesystemCache {
    /// Creates a cache rooted at `cache_dir`. Call [`initialize`] before use.
    ///
    /// [`initialize`]: FilesystemCache::initialize
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Creates the cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub async fn initialize(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).await?;
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.json"))
    }

    /// Atomic write using temp file + rename.
    async fn write_entry(&self, path: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
        let temp_path = path.with_extension("tmp");
        let json = serde_json::to_vec(entry)?;
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, path).await?;
        Ok(())
    }
}

#[async_trait]
impl TranslationCache for FilesystemCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut entry: CacheEntry = serde_json::from_slice(&data)?;
        entry.touch();
        // Access-time refresh must never turn a hit into a failure.
        if let Err(e) = self.write_entry(&path, &entry).await {
            debug!("failed to refresh accessed_at for {key}: {e}");
        }

        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        self.write_entry(&path, &CacheEntry::new(value)).await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().and_then(|s| s.to_str()) == Some("json") {
                fs::remove_file(entry.path()).await?;
            }
        }
        Ok(())
    }
}
