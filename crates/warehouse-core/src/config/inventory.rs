//! Inventory business-rule tunables.

use serde::{Deserialize, Serialize};

/// Thresholds and limits used by the warehouse services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Default low-stock threshold for new items.
    #[serde(default = "default_low_stock")]
    pub default_low_stock_threshold: i32,
    /// Default critical-stock threshold for new items.
    #[serde(default)]
    pub default_critical_stock_threshold: i32,
    /// Items with zero stock for this many months are archived by auto-archive.
    #[serde(default = "default_auto_archive_months")]
    pub auto_archive_months: u32,
    /// Fuzzy name matches scoring below this value are reported as duplicates.
    /// Score is `1 - similarity`, so `0.0` is an identical name.
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_name_threshold: f64,
    /// Number of ancestors included in a category display path.
    #[serde(default = "default_path_depth")]
    pub category_path_depth: usize,
    /// Maximum ancestor steps when checking for re-parenting cycles.
    #[serde(default = "default_ancestor_walk")]
    pub ancestor_walk_limit: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            default_low_stock_threshold: default_low_stock(),
            default_critical_stock_threshold: 0,
            auto_archive_months: default_auto_archive_months(),
            duplicate_name_threshold: default_duplicate_threshold(),
            category_path_depth: default_path_depth(),
            ancestor_walk_limit: default_ancestor_walk(),
        }
    }
}

fn default_low_stock() -> i32 {
    10
}

fn default_auto_archive_months() -> u32 {
    3
}

fn default_duplicate_threshold() -> f64 {
    0.2
}

fn default_path_depth() -> usize {
    5
}

fn default_ancestor_walk() -> usize {
    20
}
