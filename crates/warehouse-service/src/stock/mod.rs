//! Stock ledger: adjustments, transfers, moves and alerts.

pub mod alerts;
pub mod ledger;
pub mod plan;

pub use alerts::StockAlerts;
pub use ledger::{
    AdjustStockRequest, BulkMoveRequest, BulkMoveSummary, LedgerService, MoveItemRequest,
    TransferStockRequest,
};
pub use plan::AdjustMode;
