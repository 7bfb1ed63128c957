//! # warehouse-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all warehouse entities.
//!
//! Repository methods that take part in a ledger operation accept any
//! `sqlx::Executor`, so the service layer can run them inside one
//! transaction opened with [`DatabasePool::begin`] or a repository's `begin`.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
