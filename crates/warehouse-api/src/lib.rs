//! # warehouse-api
//!
//! HTTP API layer for the warehouse built on Axum.
//!
//! Provides the REST endpoints, middleware (logging, CORS, compression),
//! the bearer-token extractor, DTOs, error mapping and local media serving.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
