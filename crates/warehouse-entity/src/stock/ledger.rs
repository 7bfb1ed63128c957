//! Append-only inventory ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Stock received.
    In,
    /// Stock issued.
    Out,
    /// Stock moved between locations.
    Transfer,
    /// Dictionary or category change, no quantity effect.
    AttributeChange,
    /// Item archived.
    Archive,
    /// Item restored from the archive.
    Restore,
}

impl TransactionKind {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Transfer => "transfer",
            Self::AttributeChange => "attribute_change",
            Self::Archive => "archive",
            Self::Restore => "restore",
        }
    }
}

/// Ledger rows of one kind and reason, counted over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActivityCount {
    /// Entry kind.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Reason shared by the counted rows.
    pub reason: Option<String>,
    /// Number of rows.
    pub count: i64,
}

/// One immutable ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryTransaction {
    /// Unique identifier.
    pub id: Uuid,
    /// Affected item; null for dictionary changes or after the item is deleted.
    pub item_id: Option<Uuid>,
    /// Signed quantity change. Transfers record the moved amount.
    pub change_amount: i32,
    /// Entry kind.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Human-readable reason.
    pub reason: Option<String>,
    /// Location affected, or the destination of a transfer.
    pub storage_location_id: Option<Uuid>,
    /// Source of a transfer.
    pub from_storage_location_id: Option<Uuid>,
    /// Unit cost recorded with a receipt.
    pub cost_price: Option<Decimal>,
    /// Acting user.
    pub created_by: Option<Uuid>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransaction {
    /// Affected item.
    pub item_id: Option<Uuid>,
    /// Signed quantity change.
    pub change_amount: i32,
    /// Entry kind.
    pub kind: TransactionKind,
    /// Human-readable reason.
    pub reason: Option<String>,
    /// Location affected or transfer destination.
    pub storage_location_id: Option<Uuid>,
    /// Transfer source.
    pub from_storage_location_id: Option<Uuid>,
    /// Unit cost.
    pub cost_price: Option<Decimal>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

impl CreateTransaction {
    /// A dictionary-change entry without item or quantity.
    pub fn attribute_change(reason: impl Into<String>, created_by: Uuid) -> Self {
        Self {
            item_id: None,
            change_amount: 0,
            kind: TransactionKind::AttributeChange,
            reason: Some(reason.into()),
            storage_location_id: None,
            from_storage_location_id: None,
            cost_price: None,
            created_by: Some(created_by),
        }
    }
}

/// A ledger entry joined with display names for the history view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionView {
    /// The ledger row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: InventoryTransaction,
    /// Item name.
    pub item_name: Option<String>,
    /// Item SKU.
    pub item_sku: Option<String>,
    /// Acting user's display name.
    pub creator_name: Option<String>,
    /// Location (or destination) name.
    pub location_name: Option<String>,
    /// Transfer source name.
    pub from_location_name: Option<String>,
}
