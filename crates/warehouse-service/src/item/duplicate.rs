//! Duplicate item detection.
//!
//! An exact SKU match always wins. Otherwise the closest name is scored as
//! `1 - similarity` (normalized Levenshtein over lowercased names) and
//! reported when it falls below the configured threshold.

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

use warehouse_entity::item::ItemRef;

/// How a duplicate was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuplicateMatch {
    /// Another item has the same SKU, ignoring case.
    SkuExact {
        /// The matching item.
        duplicate: ItemRef,
        /// Whether the matching item is archived.
        is_archived: bool,
    },
    /// Another item has a very similar name.
    NameFuzzy {
        /// The matching item.
        duplicate: ItemRef,
        /// Distance score; `0.0` is identical.
        score: f64,
    },
}

/// Finds the most likely duplicate of `name`/`sku` among `candidates`.
///
/// `candidates` must already exclude the item being edited.
pub fn find_duplicate(
    candidates: &[ItemRef],
    name: &str,
    sku: Option<&str>,
    threshold: f64,
) -> Option<DuplicateMatch> {
    if let Some(sku) = sku.map(str::trim).filter(|s| !s.is_empty()) {
        let wanted = sku.to_uppercase();
        let exact = candidates.iter().find(|c| {
            c.sku
                .as_deref()
                .is_some_and(|other| other.trim().to_uppercase() == wanted)
        });
        if let Some(found) = exact {
            return Some(DuplicateMatch::SkuExact {
                duplicate: found.clone(),
                is_archived: found.is_archived,
            });
        }
    }

    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    candidates
        .iter()
        .map(|c| (c, name_score(&needle, &c.name)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, score)| *score < threshold)
        .map(|(found, score)| DuplicateMatch::NameFuzzy {
            duplicate: found.clone(),
            score,
        })
}

/// Distance between a lowercased needle and a candidate name.
fn name_score(needle: &str, candidate: &str) -> f64 {
    1.0 - normalized_levenshtein(needle, &candidate.trim().to_lowercase())
}
