//! Aggregate cache adapters.
//!
//! - `InMemoryAggregateCache` - Process-local, optionally capacity bounded
//! - `FileAggregateCache` - One JSON document per key on local disk
//! - `RedisAggregateCache` - Shared cache over a multiplexed connection

mod file;
mod in_memory;
mod redis;

pub use file::FileAggregateCache;
pub use in_memory::InMemoryAggregateCache;
pub use redis::RedisAggregateCache;

use std::sync::Arc;

use crate::config::{CacheBackend, CacheConfig};
use crate::ports::{AggregateCache, CacheError};

/// Builds the cache backend selected by configuration.
pub async fn connect(config: &CacheConfig) -> Result<Arc<dyn AggregateCache>, CacheError> {
    let cache: Arc<dyn AggregateCache> = match config.backend {
        CacheBackend::Memory => match config.max_entries {
            Some(max) => Arc::new(InMemoryAggregateCache::with_capacity_limit(max)),
            None => Arc::new(InMemoryAggregateCache::new()),
        },
        CacheBackend::File => Arc::new(FileAggregateCache::new(&config.file_dir)),
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| CacheError::Backend("redis_url is not configured".to_string()))?;
            let mut cache = RedisAggregateCache::connect(url).await?;
            if let Some(secs) = config.redis_retention_secs {
                cache = cache.with_retention_secs(secs);
            }
            Arc::new(cache)
        }
    };

    tracing::debug!(backend = ?config.backend, "Aggregate cache ready");
    Ok(cache)
}
