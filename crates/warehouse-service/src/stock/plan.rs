//! Pure stock arithmetic for ledger operations.
//!
//! Every function here is free of I/O so the quantity rules can be checked
//! without a database. The ledger service locks the rows, feeds the current
//! quantities in, and writes back whatever the plan returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warehouse_core::error::AppError;
use warehouse_entity::stock::TransactionKind;

/// How an adjustment amount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMode {
    /// Add the amount.
    In,
    /// Remove the amount.
    Out,
    /// Make the location hold exactly the amount.
    Set,
}

/// The effect of one adjustment on one stock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustPlan {
    /// Signed change applied to the row.
    pub delta: i32,
    /// Ledger entry kind, derived from the sign of `delta`.
    pub kind: TransactionKind,
    /// Row quantity after the adjustment.
    pub new_quantity: i32,
}

/// Plan an adjustment of a row currently holding `current`.
///
/// Returns `Ok(None)` for a `Set` that changes nothing.
pub fn plan_adjustment(
    mode: AdjustMode,
    amount: i32,
    current: i32,
) -> Result<Option<AdjustPlan>, AppError> {
    let delta = match mode {
        AdjustMode::In | AdjustMode::Out if amount <= 0 => {
            return Err(AppError::validation("Amount must be greater than zero"));
        }
        AdjustMode::Set if amount < 0 => {
            return Err(AppError::validation("Target quantity cannot be negative"));
        }
        AdjustMode::In => amount,
        AdjustMode::Out => -amount,
        AdjustMode::Set => amount - current,
    };

    if delta == 0 {
        return Ok(None);
    }

    let new_quantity = current
        .checked_add(delta)
        .ok_or_else(|| AppError::validation("Quantity out of range"))?;
    if new_quantity < 0 {
        return Err(AppError::validation(format!(
            "Insufficient stock: {current} available, {} requested",
            -delta
        )));
    }

    let kind = if delta > 0 {
        TransactionKind::In
    } else {
        TransactionKind::Out
    };

    Ok(Some(AdjustPlan {
        delta,
        kind,
        new_quantity,
    }))
}

/// Row quantities after moving stock between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    /// Source row quantity after the move.
    pub source_quantity: i32,
    /// Destination row quantity after the move.
    pub destination_quantity: i32,
}

/// Plan moving `amount` from a row holding `source` to one holding `destination`.
pub fn plan_transfer(
    from: Uuid,
    to: Uuid,
    amount: i32,
    source: i32,
    destination: i32,
) -> Result<TransferPlan, AppError> {
    if from == to {
        return Err(AppError::validation(
            "Source and destination locations must differ",
        ));
    }
    if amount <= 0 {
        return Err(AppError::validation("Amount must be greater than zero"));
    }
    if source < amount {
        return Err(AppError::validation(format!(
            "Insufficient stock at source location: {source} available, {amount} requested"
        )));
    }

    let destination_quantity = destination
        .checked_add(amount)
        .ok_or_else(|| AppError::validation("Quantity out of range"))?;

    Ok(TransferPlan {
        source_quantity: source - amount,
        destination_quantity,
    })
}

/// Total to place at the target when consolidating all of an item's rows.
///
/// Returns `None` when the item holds no stock.
pub fn consolidate(quantities: &[i32]) -> Option<i32> {
    let total: i64 = quantities.iter().map(|q| i64::from(*q)).sum();
    if total <= 0 {
        None
    } else {
        i32::try_from(total).ok()
    }
}

/// New value of `zero_stock_since` for an item whose total became `total`.
///
/// The marker is kept while stock stays empty, set when it runs out and
/// cleared when stock returns.
pub fn zero_stock_since(
    total: i32,
    existing: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if total > 0 {
        None
    } else {
        Some(existing.unwrap_or(now))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Duration;

    use super::*;

    /// In-memory ledger mirroring what the service writes.
    #[derive(Default)]
    struct Book {
        rows: HashMap<Uuid, i32>,
        total: i32,
        entries: Vec<(TransactionKind, i32)>,
    }

    impl Book {
        fn adjust(&mut self, loc: Uuid, mode: AdjustMode, amount: i32) -> Result<(), AppError> {
            let current = self.rows.get(&loc).copied().unwrap_or(0);
            if let Some(plan) = plan_adjustment(mode, amount, current)? {
                self.rows.insert(loc, plan.new_quantity);
                self.entries.push((plan.kind, plan.delta));
            }
            self.total = self.rows.values().sum();
            Ok(())
        }

        fn transfer(&mut self, from: Uuid, to: Uuid, amount: i32) -> Result<(), AppError> {
            let source = self.rows.get(&from).copied().unwrap_or(0);
            let destination = self.rows.get(&to).copied().unwrap_or(0);
            let plan = plan_transfer(from, to, amount, source, destination)?;
            self.rows.insert(from, plan.source_quantity);
            self.rows.insert(to, plan.destination_quantity);
            self.entries.push((TransactionKind::Transfer, amount));
            self.total = self.rows.values().sum();
            Ok(())
        }

        fn assert_consistent(&self) {
            assert_eq!(self.total, self.rows.values().sum::<i32>());
            assert!(self.rows.values().all(|q| *q >= 0));
        }
    }

    #[test]
    fn test_in_and_out() {
        let plan = plan_adjustment(AdjustMode::In, 5, 10).unwrap().unwrap();
        assert_eq!(plan.delta, 5);
        assert_eq!(plan.kind, TransactionKind::In);
        assert_eq!(plan.new_quantity, 15);

        let plan = plan_adjustment(AdjustMode::Out, 4, 10).unwrap().unwrap();
        assert_eq!(plan.delta, -4);
        assert_eq!(plan.kind, TransactionKind::Out);
        assert_eq!(plan.new_quantity, 6);
    }

    #[test]
    fn test_set_derives_direction() {
        let up = plan_adjustment(AdjustMode::Set, 12, 7).unwrap().unwrap();
        assert_eq!((up.delta, up.kind), (5, TransactionKind::In));

        let down = plan_adjustment(AdjustMode::Set, 2, 7).unwrap().unwrap();
        assert_eq!((down.delta, down.kind), (-5, TransactionKind::Out));
        assert_eq!(down.new_quantity, 2);
    }

    #[test]
    fn test_set_to_current_is_noop() {
        assert_eq!(plan_adjustment(AdjustMode::Set, 7, 7).unwrap(), None);
        assert_eq!(plan_adjustment(AdjustMode::Set, 0, 0).unwrap(), None);
    }

    #[test]
    fn test_out_below_zero_rejected() {
        let err = plan_adjustment(AdjustMode::Out, 11, 10).unwrap_err();
        assert!(err.message.contains("Insufficient stock"));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        assert!(plan_adjustment(AdjustMode::In, 0, 5).is_err());
        assert!(plan_adjustment(AdjustMode::Out, -3, 5).is_err());
        assert!(plan_adjustment(AdjustMode::Set, -1, 5).is_err());
    }

    #[test]
    fn test_transfer_rules() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        let plan = plan_transfer(a, b, 3, 10, 1).unwrap();
        assert_eq!(plan.source_quantity, 7);
        assert_eq!(plan.destination_quantity, 4);

        assert!(plan_transfer(a, a, 3, 10, 10).is_err());
        assert!(plan_transfer(a, b, 0, 10, 0).is_err());
        assert!(plan_transfer(a, b, 11, 10, 0).is_err());
    }

    #[test]
    fn test_total_matches_rows_through_a_sequence() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let mut book = Book::default();

        book.adjust(a, AdjustMode::In, 20).unwrap();
        book.adjust(b, AdjustMode::In, 5).unwrap();
        book.transfer(a, b, 8).unwrap();
        book.adjust(b, AdjustMode::Set, 3).unwrap();
        book.adjust(a, AdjustMode::Out, 12).unwrap();
        book.assert_consistent();
        assert_eq!(book.total, 3);

        // Rejected operations leave the book untouched.
        let before = book.entries.len();
        assert!(book.transfer(a, b, 1).is_err());
        assert!(book.adjust(a, AdjustMode::Out, 1).is_err());
        assert_eq!(book.entries.len(), before);
        book.assert_consistent();
    }

    #[test]
    fn test_consolidate() {
        assert_eq!(consolidate(&[3, 0, 4]), Some(7));
        assert_eq!(consolidate(&[0, 0]), None);
        assert_eq!(consolidate(&[]), None);
    }

    #[test]
    fn test_zero_stock_marker() {
        let now = Utc::now();
        let earlier = now - Duration::days(30);

        assert_eq!(zero_stock_since(0, None, now), Some(now));
        assert_eq!(zero_stock_since(0, Some(earlier), now), Some(earlier));
        assert_eq!(zero_stock_since(5, Some(earlier), now), None);
    }
}
