//! Core traits defined in `warehouse-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
