//! Request DTOs with validation.
//!
//! Bodies that map one-to-one onto a service request are deserialized into
//! the service type directly; the types here cover login, bulk selections
//! and query strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use warehouse_entity::item::{ItemFilter, ItemSort, StockStatusFilter};
use warehouse_entity::stock::TransactionKind;
use warehouse_service::history::HistoryFilter;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Selection of items with a free-text reason (archive, restore).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemReasonRequest {
    /// Selected items.
    #[validate(length(min = 1, message = "No items selected"))]
    pub ids: Vec<Uuid>,
    /// Reason or comment stored in the ledger.
    #[serde(default)]
    pub reason: String,
}

/// Selection of items to delete.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteItemsRequest {
    /// Selected items.
    #[validate(length(min = 1, message = "No items selected"))]
    pub ids: Vec<Uuid>,
    /// Password of the acting user, required when any item has history.
    #[serde(default)]
    pub password: Option<String>,
}

/// Move a selection of items into one category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkCategoryRequest {
    /// Selected items.
    #[validate(length(min = 1, message = "No items selected"))]
    pub ids: Vec<Uuid>,
    /// Target category; `null` detaches the items.
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// Duplicate check for a prospective item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckDuplicateRequest {
    /// Candidate name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Candidate SKU.
    #[serde(default)]
    pub sku: Option<String>,
    /// Item being edited, excluded from matching.
    #[serde(default)]
    pub exclude_id: Option<Uuid>,
}

/// Ledger rows to delete.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteHistoryRequest {
    /// Selected ledger rows.
    #[validate(length(min = 1, message = "No history entries selected"))]
    pub ids: Vec<Uuid>,
}

/// Query string of `GET /warehouse/items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsQuery {
    /// Substring of name or SKU.
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated category IDs.
    #[serde(default)]
    pub category_ids: Option<String>,
    /// Stock status.
    #[serde(default)]
    pub status: StockStatusFilter,
    /// Only items stocked at this location.
    #[serde(default)]
    pub location_id: Option<Uuid>,
    /// Archived items instead of active ones.
    #[serde(default)]
    pub archived: bool,
    /// Only items without a category.
    #[serde(default)]
    pub orphaned: bool,
    /// Result ordering.
    #[serde(default)]
    pub sort: ItemSort,
}

impl ItemsQuery {
    /// Converts to a repository filter, skipping unparsable IDs.
    pub fn into_filter(self) -> ItemFilter {
        let category_ids = self
            .category_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|id| Uuid::parse_str(id.trim()).ok())
            .collect();

        ItemFilter {
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            category_ids,
            status: self.status,
            location_id: self.location_id,
            archived: self.archived,
            orphaned: self.orphaned,
            sort: self.sort,
        }
    }
}

/// Query string of `GET /warehouse/attributes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributesQuery {
    /// Only attributes of this type.
    #[serde(default, rename = "type")]
    pub type_slug: Option<String>,
}

/// Query string of `GET /warehouse/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Only entries of this item.
    #[serde(default)]
    pub item_id: Option<Uuid>,
    /// Only entries of this kind.
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
}

impl From<HistoryQuery> for HistoryFilter {
    fn from(query: HistoryQuery) -> Self {
        HistoryFilter {
            item_id: query.item_id,
            kind: query.kind,
        }
    }
}

/// Query string of `GET /warehouse/categories/{id}/paths`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPathsQuery {
    /// Also report whether the category lies under this one.
    #[serde(default)]
    pub ancestor: Option<Uuid>,
}

/// Query string of `DELETE /warehouse/items/{id}/images/{slot}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageIndexQuery {
    /// Position of the detail image to remove.
    #[serde(default)]
    pub index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_query_parses_category_list() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let query = ItemsQuery {
            search: Some("  ".to_string()),
            category_ids: Some(format!("{first}, not-a-uuid,{second}")),
            ..ItemsQuery::default()
        };

        let filter = query.into_filter();
        assert_eq!(filter.category_ids, vec![first, second]);
        assert_eq!(filter.search, None);
        assert_eq!(filter.status, StockStatusFilter::All);
    }

    #[test]
    fn test_selection_requires_ids() {
        let empty = ItemReasonRequest {
            ids: Vec::new(),
            reason: "Сезон закончился".to_string(),
        };
        assert!(empty.validate().is_err());

        let login = LoginRequest {
            username: "admin".to_string(),
            password: String::new(),
        };
        assert!(login.validate().is_err());
    }
}
