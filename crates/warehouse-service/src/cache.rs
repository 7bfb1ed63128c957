//! Read-through caching of dictionary lists.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use warehouse_cache::CacheManager;
use warehouse_cache::keys::WAREHOUSE_PREFIX;
use warehouse_core::result::AppResult;

/// Thin wrapper over the cache manager for warehouse lists.
///
/// Cache failures never fail a request: reads fall through to the database
/// and writes are dropped with a warning.
#[derive(Debug, Clone)]
pub struct WarehouseCache {
    /// Underlying cache.
    cache: Arc<CacheManager>,
    /// TTL of cached lists.
    ttl: Duration,
}

impl WarehouseCache {
    /// Creates a new cache wrapper.
    pub fn new(cache: Arc<CacheManager>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Returns the cached value for `key`, or loads and caches it.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, load: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        match self.cache.get_json::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key = %key, "Cache hit");
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Cache read failed"),
        }

        let value = load().await?;
        if let Err(e) = self.cache.set_json(key, &value, self.ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
        Ok(value)
    }

    /// Drops every warehouse cache entry.
    pub async fn invalidate(&self) {
        match self.cache.delete_prefix(WAREHOUSE_PREFIX).await {
            Ok(count) => debug!(count, "Warehouse cache invalidated"),
            Err(e) => warn!(error = %e, "Cache invalidation failed"),
        }
    }
}
