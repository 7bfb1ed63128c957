//! Ledger history and audit log views.

pub mod service;

pub use service::{HistoryFilter, HistoryService};
