//! Redis backend, enabled by the `redis-backend` feature.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;
