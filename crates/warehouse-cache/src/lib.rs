//! # warehouse-cache
//!
//! Read-through cache for warehouse dictionaries.
//!
//! - **memory**: per-process [moka](https://crates.io/crates/moka) cache, the default
//! - **redis**: shared cache for several server instances
//!
//! All keys live under [`keys::WAREHOUSE_PREFIX`].

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
