//! Storage location entity.

pub mod model;

pub use model::{LocationData, LocationKind, LocationStockItem, LocationWithItems, StorageLocation};
