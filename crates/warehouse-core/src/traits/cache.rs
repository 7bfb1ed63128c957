//! Key/value cache backend.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A string key/value store with per-entry expiry.
///
/// Values are opaque strings; callers serialize them. Keys are namespaced by
/// the caller, so `delete_prefix("warehouse:")` clears one namespace only.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Reads a live entry.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Writes an entry that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Removes one entry. Missing keys are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Removes every entry whose key starts with `prefix` and returns how many went.
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64>;

    /// Round-trips to the backend.
    async fn ping(&self) -> AppResult<()>;
}
