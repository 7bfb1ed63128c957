//! Cache backend settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which store backs the dictionary cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Per-process moka cache.
    #[default]
    Memory,
    /// Shared Redis server.
    Redis,
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

/// Dictionary cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Selected backend.
    pub provider: CacheBackend,
    /// Lifetime of cached category, attribute and location lists.
    pub category_ttl_seconds: u64,
    /// Used when `provider = "redis"`.
    pub redis: RedisCacheConfig,
    /// Used when `provider = "memory"`.
    pub memory: MemoryCacheConfig,
}

impl CacheConfig {
    /// Lifetime of cached dictionary lists.
    pub fn category_ttl(&self) -> Duration {
        Duration::from_secs(self.category_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheBackend::Memory,
            category_ttl_seconds: 3600,
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// Redis connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisCacheConfig {
    /// `redis://` or `rediss://` URL, credentials included.
    pub url: String,
    /// Prepended to every key, for sharing one Redis between deployments.
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            key_prefix: String::new(),
        }
    }
}

/// In-process cache limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCacheConfig {
    /// Entry count bound.
    pub max_capacity: u64,
    /// Upper bound on any entry's lifetime.
    pub time_to_live_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live_seconds: 3600,
        }
    }
}
