//! Cache key builders for all warehouse cache entries.
//!
//! Every key starts with [`WAREHOUSE_PREFIX`] so one prefix delete
//! invalidates everything after a dictionary or stock mutation.

use uuid::Uuid;

/// Namespace shared by all warehouse cache keys.
pub const WAREHOUSE_PREFIX: &str = "warehouse:";

fn key(parts: &[&str]) -> String {
    format!("{WAREHOUSE_PREFIX}{}", parts.join(":"))
}

/// Ordered category list with item counts.
pub fn categories_all() -> String {
    key(&["categories", "all"])
}

/// Attribute type list.
pub fn attribute_types_all() -> String {
    key(&["attribute-types", "all"])
}

/// Attribute dictionary.
pub fn attributes_all() -> String {
    key(&["attributes", "all"])
}

/// Storage locations with their stocked items.
pub fn locations_all() -> String {
    key(&["locations", "all"])
}

/// Per-location stock rows of one item.
pub fn item_stocks(item_id: Uuid) -> String {
    key(&["stocks", &item_id.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_share_the_namespace() {
        for key in [
            categories_all(),
            attribute_types_all(),
            attributes_all(),
            locations_all(),
            item_stocks(Uuid::nil()),
        ] {
            assert!(key.starts_with(WAREHOUSE_PREFIX), "{key} escapes the namespace");
        }
        assert_eq!(
            item_stocks(Uuid::nil()),
            "warehouse:stocks:00000000-0000-0000-0000-000000000000"
        );
    }
}
