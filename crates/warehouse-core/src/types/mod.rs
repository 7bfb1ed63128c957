//! Core type definitions used across the warehouse workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
