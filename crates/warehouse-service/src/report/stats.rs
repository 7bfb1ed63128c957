//! Dashboard statistics: stock totals, low-stock items and recent activity.

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

use warehouse_core::error::AppError;
use warehouse_database::repositories::item::ItemRepository;
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_entity::item::LowStockItem;
use warehouse_entity::stock::{ActivityCount, TransactionKind};

/// Low-stock items listed on the dashboard.
pub const LOW_STOCK_LIMIT: i64 = 20;

/// Days of ledger activity summarized.
pub const ACTIVITY_DAYS: u64 = 30;

/// Reason fragments that mark an issue as a write-off rather than usage.
const WASTE_MARKERS: [&str; 2] = ["брак", "списание"];

/// Ledger activity over the reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Receipts.
    pub ins: i64,
    /// Issues for production or sale.
    pub usage: i64,
    /// Issues written off as defects or losses.
    pub waste: i64,
    /// Moves between locations.
    pub transfers: i64,
}

impl Activity {
    /// Sums grouped ledger counts. Kinds without a stock effect are ignored.
    pub fn tally(rows: &[ActivityCount]) -> Self {
        let mut activity = Self::default();
        for row in rows {
            match row.kind {
                TransactionKind::In => activity.ins += row.count,
                TransactionKind::Transfer => activity.transfers += row.count,
                TransactionKind::Out if is_waste(row.reason.as_deref()) => {
                    activity.waste += row.count
                }
                TransactionKind::Out => activity.usage += row.count,
                _ => {}
            }
        }
        activity
    }
}

fn is_waste(reason: Option<&str>) -> bool {
    reason.is_some_and(|r| {
        let lower = r.to_lowercase();
        WASTE_MARKERS.iter().any(|m| lower.contains(m))
    })
}

/// Dashboard figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseStats {
    /// Units held by active items.
    pub total_stock: i64,
    /// Units reserved for open orders.
    pub total_reserved: i64,
    /// Archived items.
    pub archived_count: i64,
    /// Active items at or below their low-stock threshold.
    pub critical_items: Vec<LowStockItem>,
    /// Ledger activity since `activity_since`.
    pub activity: Activity,
    /// Start of the activity window.
    pub activity_since: DateTime<Utc>,
}

/// Computes dashboard statistics.
#[derive(Debug, Clone)]
pub struct StatsService {
    /// Item repository.
    item_repo: Arc<ItemRepository>,
    /// Ledger repository.
    transaction_repo: Arc<TransactionRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(item_repo: Arc<ItemRepository>, transaction_repo: Arc<TransactionRepository>) -> Self {
        Self {
            item_repo,
            transaction_repo,
        }
    }

    /// Current figures, with activity counted from midnight `ACTIVITY_DAYS` ago.
    pub async fn stats(&self) -> Result<WarehouseStats, AppError> {
        let since = activity_window_start(Utc::now());

        let (totals, archived_count, critical_items, activity) = tokio::try_join!(
            self.item_repo.stock_totals(),
            self.item_repo.archived_count(),
            self.item_repo.low_stock(LOW_STOCK_LIMIT),
            self.transaction_repo.activity_since(since),
        )?;

        Ok(WarehouseStats {
            total_stock: totals.0,
            total_reserved: totals.1,
            archived_count,
            critical_items,
            activity: Activity::tally(&activity),
            activity_since: since,
        })
    }
}

/// Midnight UTC, `ACTIVITY_DAYS` before `now`.
fn activity_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let day = now
        .date_naive()
        .checked_sub_days(Days::new(ACTIVITY_DAYS))
        .unwrap_or(now.date_naive());
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row(kind: TransactionKind, reason: Option<&str>, count: i64) -> ActivityCount {
        ActivityCount {
            kind,
            reason: reason.map(str::to_string),
            count,
        }
    }

    #[test]
    fn test_tally_splits_waste_from_usage() {
        let rows = vec![
            row(TransactionKind::In, Some("Поставка"), 4),
            row(TransactionKind::Out, Some("Отгрузка заказа"), 3),
            row(TransactionKind::Out, Some("Брак при печати"), 2),
            row(TransactionKind::Out, Some("СПИСАНИЕ: потеря"), 1),
            row(TransactionKind::Out, None, 5),
            row(TransactionKind::Transfer, None, 6),
            row(TransactionKind::AttributeChange, Some("Category created"), 9),
            row(TransactionKind::Archive, None, 1),
        ];

        assert_eq!(
            Activity::tally(&rows),
            Activity {
                ins: 4,
                usage: 8,
                waste: 3,
                transfers: 6,
            }
        );
    }

    #[test]
    fn test_window_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 15, 42, 7).unwrap();
        assert_eq!(
            activity_window_start(now),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
    }
}
