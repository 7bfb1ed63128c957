//! Inventory item entity.

pub mod images;
pub mod level;
pub mod model;

pub use images::{ImageSlot, ItemImages};
pub use level::StockLevel;
pub use model::{
    AttributeCodes, InventoryItem, ItemData, ItemFilter, ItemRef, ItemSort, ItemSummary, ItemType,
    LowStockItem, StockStatusFilter,
};
