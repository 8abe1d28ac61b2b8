//! In-Memory Aggregate Cache Adapter
//!
//! Keeps entries in process memory in write order. With a capacity set,
//! the least recently written entry is evicted once the bound is exceeded.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::aggregation::{CacheEntry, CacheKey};
use crate::ports::{AggregateCache, CacheError};

/// In-memory storage for aggregated results
#[derive(Debug, Clone, Default)]
pub struct InMemoryAggregateCache {
    entries: Arc<RwLock<IndexMap<String, CacheEntry>>>,
    max_entries: Option<usize>,
}

impl InMemoryAggregateCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `max_entries` entries
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: Arc::default(),
            max_entries: Some(max_entries.max(1)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Keys in write order, oldest first
    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl AggregateCache for InMemoryAggregateCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.read().await.get(key.as_str()).cloned())
    }

    async fn set(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        // Re-insert so an overwrite counts as the newest write.
        entries.shift_remove(key.as_str());
        entries.insert(key.as_str().to_string(), entry.clone());

        if let Some(max) = self.max_entries {
            while entries.len() > max {
                if let Some((evicted, _)) = entries.shift_remove_index(0) {
                    tracing::debug!(key = %evicted, "Evicted cache entry over capacity");
                }
            }
        }
        Ok(())
    }

    async fn remove_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}
