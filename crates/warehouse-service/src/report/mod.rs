//! Warehouse dashboard reports.

pub mod stats;

pub use stats::{Activity, StatsService, WarehouseStats};
