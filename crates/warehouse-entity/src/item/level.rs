//! Stock level classification.

use serde::{Deserialize, Serialize};

/// How an item's quantity compares to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Above the low-stock threshold.
    Normal,
    /// At or below the low-stock threshold.
    Low,
    /// At or below the critical threshold.
    Critical,
    /// Nothing left.
    Out,
}

impl StockLevel {
    /// Classify `quantity`. A non-positive quantity is always [`StockLevel::Out`].
    pub fn classify(quantity: i32, low_threshold: i32, critical_threshold: i32) -> Self {
        if quantity <= 0 {
            Self::Out
        } else if quantity <= critical_threshold {
            Self::Critical
        } else if quantity <= low_threshold {
            Self::Low
        } else {
            Self::Normal
        }
    }

    /// Whether the level should raise an alert.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}
