//! Identifier cache for resolved links

use moka::future::Cache;
use serde::{Deserialize, Serialize};

/// Kind of identifier stored under a link
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdKind {
    Channel,
    Video,
}

/// Link → identifier cache owned by one fetcher.
///
/// Entries never expire and are never evicted; they go away on `clear` or
/// when the owning fetcher is dropped. Clones share the same storage, so the
/// cache can be handed to concurrent tasks.
#[derive(Clone)]
pub struct IdentifierCache {
    entries: Cache<(IdKind, String), String>,
}

impl IdentifierCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    pub async fn get(&self, kind: IdKind, link: &str) -> Option<String> {
        self.entries.get(&(kind, link.to_string())).await
    }

    pub async fn insert(&self, kind: IdKind, link: &str, id: String) {
        self.entries.insert((kind, link.to_string()), id).await;
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate entry count after pending maintenance has run
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for IdentifierCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub identifier_entries: u64,
}
