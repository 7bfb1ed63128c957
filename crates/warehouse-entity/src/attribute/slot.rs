//! Attribute types with dedicated item columns.

use serde::{Deserialize, Serialize};

/// The five attribute types stored in their own item columns.
///
/// All other types are "custom" and live in the item's JSON attribute bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSlot {
    /// Brand.
    Brand,
    /// Quality grade.
    Quality,
    /// Material.
    Material,
    /// Color.
    Color,
    /// Size.
    Size,
}

impl FixedSlot {
    /// Slot order used when assembling SKUs.
    pub const SKU_ORDER: [FixedSlot; 5] = [
        FixedSlot::Brand,
        FixedSlot::Quality,
        FixedSlot::Material,
        FixedSlot::Color,
        FixedSlot::Size,
    ];

    /// Slot order used when composing names. Material is not part of names.
    pub const NAME_ORDER: [FixedSlot; 4] = [
        FixedSlot::Brand,
        FixedSlot::Quality,
        FixedSlot::Color,
        FixedSlot::Size,
    ];

    /// Attribute type slug of this slot.
    pub fn type_slug(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Quality => "quality",
            Self::Material => "material",
            Self::Color => "color",
            Self::Size => "size",
        }
    }

    /// Item column holding the attribute code.
    pub fn item_column(&self) -> &'static str {
        match self {
            Self::Brand => "brand_code",
            Self::Quality => "quality_code",
            Self::Material => "material_code",
            Self::Color => "color_code",
            Self::Size => "size_code",
        }
    }

    /// Resolve a type slug to its fixed slot.
    pub fn from_type_slug(slug: &str) -> Option<Self> {
        Self::SKU_ORDER.into_iter().find(|s| s.type_slug() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_slug() {
        assert_eq!(FixedSlot::from_type_slug("color"), Some(FixedSlot::Color));
        assert_eq!(FixedSlot::from_type_slug("print"), None);
    }

    #[test]
    fn test_item_columns_are_distinct() {
        let mut columns: Vec<_> = FixedSlot::SKU_ORDER.iter().map(|s| s.item_column()).collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), 5);
    }
}
