//! Stock rows, the ledger and transfer records.

pub mod ledger;
pub mod model;
pub mod transfer;

pub use ledger::{ActivityCount, CreateTransaction, InventoryTransaction, TransactionKind, TransactionView};
pub use model::{InventoryStock, StockWithLocation};
pub use transfer::{CreateTransfer, InventoryTransfer};
