use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cached step output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The cached step output.
    pub value: String,

    /// When the entry was first written.
    pub created_at: DateTime<Utc>,

    /// When the entry was last read. Refreshed best-effort.
    pub accessed_at: DateTime<Utc>,
}

impl CacheEntry {
    /// A fresh entry stamped with the current time.
    pub fn new(value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            value: value.into(),
            created_at: now,
            accessed_at: now,
        }
    }

    /// Marks the entry as read now.
    pub fn touch(&mut self) {
        self.accessed_at = Utc::now();
    }
}
