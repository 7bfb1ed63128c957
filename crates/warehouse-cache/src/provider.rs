//! Backend selection and typed access.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use warehouse_core::config::{CacheBackend, CacheConfig};
use warehouse_core::error::AppError;
use warehouse_core::result::AppResult;
use warehouse_core::traits::cache::CacheProvider;

/// Front door to whichever backend `cache.provider` names.
#[derive(Debug, Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Builds the configured backend (`memory` or `redis`).
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let backend: Arc<dyn CacheProvider> = match config.provider {
            #[cfg(feature = "redis-backend")]
            CacheBackend::Redis => {
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            CacheBackend::Memory => Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory)),
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "Cache backend '{other}' is not compiled into this build"
                )));
            }
        };

        info!(provider = %config.provider, "Cache ready");
        Ok(Self { backend })
    }

    /// Reads and decodes a JSON entry.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes and writes a JSON entry.
    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw, ttl).await
    }

    /// Clears one key namespace.
    pub async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        self.backend.delete_prefix(prefix).await
    }

    /// Whether the backend answers.
    pub async fn is_healthy(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Cache ping failed");
                false
            }
        }
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_entries_round_trip_and_clear() {
        let manager = CacheManager::new(&CacheConfig::default()).await.unwrap();
        let ttl = Duration::from_secs(60);
        manager.set_json("warehouse:test", &vec![1, 2, 3], ttl).await.unwrap();
        manager.set_json("other:test", "kept", ttl).await.unwrap();

        let back: Option<Vec<i32>> = manager.get_json("warehouse:test").await.unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
        assert!(manager.is_healthy().await);

        manager.delete_prefix("warehouse:").await.unwrap();
        let gone: Option<Vec<i32>> = manager.get_json("warehouse:test").await.unwrap();
        assert_eq!(gone, None);
        let kept: Option<String> = manager.get_json("other:test").await.unwrap();
        assert_eq!(kept.as_deref(), Some("kept"));
    }
}
