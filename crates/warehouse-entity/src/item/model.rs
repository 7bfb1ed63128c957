//! Inventory item entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::level::StockLevel;
use crate::attribute::FixedSlot;

/// Broad kind of a stocked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Garments, the default.
    #[default]
    Clothing,
    /// Boxes, bags, wrapping.
    Packaging,
    /// Ink, thread and other consumables.
    Consumables,
}

/// A stocked product.
///
/// `quantity` is a cached aggregate: it always equals the sum of the item's
/// per-location stock rows after a ledger operation commits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    /// Unique item identifier.
    pub id: Uuid,
    /// Display name, generated from attributes unless overridden.
    pub name: String,
    /// Stock-keeping unit, unique case-insensitively.
    pub sku: Option<String>,
    /// Category of the item.
    pub category_id: Option<Uuid>,
    /// Kind of item.
    pub item_type: ItemType,
    /// Cached total over all storage locations.
    pub quantity: i32,
    /// Unit of measure.
    pub unit: String,
    /// At or below this quantity the item is low on stock.
    pub low_stock_threshold: i32,
    /// At or below this quantity the item is critically low.
    pub critical_stock_threshold: i32,
    /// Free-form description.
    pub description: Option<String>,
    /// Brand attribute code.
    pub brand_code: Option<String>,
    /// Quality attribute code.
    pub quality_code: Option<String>,
    /// Material attribute code.
    pub material_code: Option<String>,
    /// Color attribute code.
    pub color_code: Option<String>,
    /// Size attribute code.
    pub size_code: Option<String>,
    /// Codes of custom attribute types keyed by type slug.
    pub attributes: serde_json::Value,
    /// Front image URL.
    pub image: Option<String>,
    /// Back image URL.
    pub image_back: Option<String>,
    /// Side image URL.
    pub image_side: Option<String>,
    /// Additional detail image URLs.
    pub image_details: serde_json::Value,
    /// Quantity reserved for open orders.
    pub reserved_quantity: i32,
    /// Purchase price per unit.
    pub cost_price: Option<Decimal>,
    /// Selling price per unit.
    pub selling_price: Option<Decimal>,
    /// Whether the item is archived.
    pub is_archived: bool,
    /// When the item was archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Who archived the item.
    pub archived_by: Option<Uuid>,
    /// Why the item was archived.
    pub archive_reason: Option<String>,
    /// Since when the total quantity has been zero.
    pub zero_stock_since: Option<DateTime<Utc>>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Read access to the attribute codes an item carries, shared by stored
/// rows and pending writes.
pub trait AttributeCodes {
    /// Raw value of a fixed attribute column.
    fn fixed_column(&self, slot: FixedSlot) -> Option<&str>;

    /// The JSON bag of custom attribute codes.
    fn attribute_bag(&self) -> &serde_json::Value;

    /// Code stored in a fixed attribute column, ignoring blanks.
    fn slot_code(&self, slot: FixedSlot) -> Option<&str> {
        self.fixed_column(slot)
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Code of a custom attribute type from the JSON bag, ignoring blanks.
    fn custom_code(&self, type_slug: &str) -> Option<&str> {
        self.attribute_bag()
            .get(type_slug)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

macro_rules! impl_attribute_codes {
    ($ty:ty) => {
        impl AttributeCodes for $ty {
            fn fixed_column(&self, slot: FixedSlot) -> Option<&str> {
                match slot {
                    FixedSlot::Brand => self.brand_code.as_deref(),
                    FixedSlot::Quality => self.quality_code.as_deref(),
                    FixedSlot::Material => self.material_code.as_deref(),
                    FixedSlot::Color => self.color_code.as_deref(),
                    FixedSlot::Size => self.size_code.as_deref(),
                }
            }

            fn attribute_bag(&self) -> &serde_json::Value {
                &self.attributes
            }
        }
    };
}

impl_attribute_codes!(InventoryItem);
impl_attribute_codes!(ItemData);

impl InventoryItem {
    /// Classify the current quantity against the item's thresholds.
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(
            self.quantity,
            self.low_stock_threshold,
            self.critical_stock_threshold,
        )
    }
}

/// An item joined with its category name for list views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemSummary {
    /// The item row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: InventoryItem,
    /// Name of the item's category.
    pub category_name: Option<String>,
}

/// Writable columns of an item, used for both insert and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemData {
    /// Display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: Option<String>,
    /// Category of the item.
    pub category_id: Option<Uuid>,
    /// Kind of item.
    pub item_type: ItemType,
    /// Unit of measure.
    pub unit: String,
    /// Low-stock threshold.
    pub low_stock_threshold: i32,
    /// Critical-stock threshold.
    pub critical_stock_threshold: i32,
    /// Free-form description.
    pub description: Option<String>,
    /// Brand attribute code.
    pub brand_code: Option<String>,
    /// Quality attribute code.
    pub quality_code: Option<String>,
    /// Material attribute code.
    pub material_code: Option<String>,
    /// Color attribute code.
    pub color_code: Option<String>,
    /// Size attribute code.
    pub size_code: Option<String>,
    /// Custom attribute codes keyed by type slug.
    pub attributes: serde_json::Value,
    /// Front image URL.
    pub image: Option<String>,
    /// Back image URL.
    pub image_back: Option<String>,
    /// Side image URL.
    pub image_side: Option<String>,
    /// Additional detail image URLs.
    pub image_details: serde_json::Value,
    /// Purchase price per unit.
    pub cost_price: Option<Decimal>,
    /// Selling price per unit.
    pub selling_price: Option<Decimal>,
}

impl ItemData {
    /// Copy the writable columns of an existing item.
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            sku: item.sku.clone(),
            category_id: item.category_id,
            item_type: item.item_type,
            unit: item.unit.clone(),
            low_stock_threshold: item.low_stock_threshold,
            critical_stock_threshold: item.critical_stock_threshold,
            description: item.description.clone(),
            brand_code: item.brand_code.clone(),
            quality_code: item.quality_code.clone(),
            material_code: item.material_code.clone(),
            color_code: item.color_code.clone(),
            size_code: item.size_code.clone(),
            attributes: item.attributes.clone(),
            image: item.image.clone(),
            image_back: item.image_back.clone(),
            image_side: item.image_side.clone(),
            image_details: item.image_details.clone(),
            cost_price: item.cost_price,
            selling_price: item.selling_price,
        }
    }
}

/// Stock status filter for item listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatusFilter {
    /// No status filter.
    #[default]
    All,
    /// Above the low-stock threshold.
    In,
    /// At or below the low threshold but above the critical one.
    Low,
    /// At or below the critical threshold.
    Out,
}

/// Sort order for item listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSort {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Largest quantity first.
    Quantity,
    /// Alphabetical by name.
    Name,
    /// Alphabetical by SKU.
    Sku,
    /// Most recently archived first.
    ArchivedAt,
}

impl ItemSort {
    /// SQL ORDER BY expression over the `i` alias.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::CreatedAt => "i.created_at DESC",
            Self::Quantity => "i.quantity DESC, i.created_at DESC",
            Self::Name => "i.name ASC",
            Self::Sku => "i.sku ASC NULLS LAST",
            Self::ArchivedAt => "i.archived_at DESC NULLS LAST",
        }
    }
}

/// Filters for item listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Substring of name or SKU, case-insensitive.
    pub search: Option<String>,
    /// Restrict to these categories.
    pub category_ids: Vec<Uuid>,
    /// Stock status.
    pub status: StockStatusFilter,
    /// Only items with positive stock at this location.
    pub location_id: Option<Uuid>,
    /// Archived items instead of active ones.
    pub archived: bool,
    /// Only items without a category. Overrides `category_ids`.
    pub orphaned: bool,
    /// Result ordering.
    pub sort: ItemSort,
}

/// An active item at or below its low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LowStockItem {
    /// Item identifier.
    pub id: Uuid,
    /// Item name.
    pub name: String,
    /// Cached total quantity.
    pub quantity: i32,
    /// Unit of measure.
    pub unit: String,
}

/// Minimal item projection used by duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ItemRef {
    /// Item identifier.
    pub id: Uuid,
    /// Item name.
    pub name: String,
    /// Item SKU.
    pub sku: Option<String>,
    /// Whether the item is archived.
    pub is_archived: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_codes_ignore_blanks() {
        let data = ItemData {
            brand_code: Some(" hd ".to_string()),
            color_code: Some("   ".to_string()),
            attributes: json!({ "fit": "OVR", "print": "", "weight": 240 }),
            ..ItemData::default()
        };

        assert_eq!(data.slot_code(FixedSlot::Brand), Some("hd"));
        assert_eq!(data.slot_code(FixedSlot::Color), None);
        assert_eq!(data.slot_code(FixedSlot::Size), None);
        assert_eq!(data.custom_code("fit"), Some("OVR"));
        assert_eq!(data.custom_code("print"), None);
        assert_eq!(data.custom_code("weight"), None);
        assert_eq!(data.custom_code("missing"), None);
    }
}
