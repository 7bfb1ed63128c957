//! Category tree management.

pub mod seed;
pub mod service;
pub mod slug;

pub use service::{CategoryOrder, CategoryRequest, CategoryService, RebuildSummary, SeedSummary};
