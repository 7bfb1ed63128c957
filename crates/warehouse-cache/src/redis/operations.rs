//! Redis-backed [`CacheProvider`].

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use warehouse_core::error::{AppError, ErrorKind};
use warehouse_core::result::AppResult;
use warehouse_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Keys removed per UNLINK round-trip during a prefix delete.
const UNLINK_BATCH: usize = 500;

/// Shared cache for multi-node deployments.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Wraps a connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn redis_err(action: &'static str) -> impl FnOnce(redis::RedisError) -> AppError {
    move |e| AppError::with_source(ErrorKind::Cache, format!("Redis {action} failed"), e)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.connection();
        conn.get(self.client.namespaced(key))
            .await
            .map_err(redis_err("GET"))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.client.connection();
        conn.set_ex(self.client.namespaced(key), value, ttl.as_secs().max(1))
            .await
            .map_err(redis_err("SETEX"))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.connection();
        conn.unlink(self.client.namespaced(key))
            .await
            .map_err(redis_err("UNLINK"))
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let pattern = format!("{}*", self.client.namespaced(prefix));

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        let mut conn = self.client.connection();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(UNLINK_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(redis_err("SCAN"))?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        let mut removed = 0u64;
        for chunk in keys.chunks(UNLINK_BATCH) {
            let count: u64 = conn.unlink(chunk.to_vec()).await.map_err(redis_err("UNLINK"))?;
            removed += count;
        }

        debug!(prefix, removed, "Evicted cache namespace");
        Ok(removed)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.client.connection();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_err("PING"))?;
        Ok(())
    }
}
