//! Deterministic SKU and name composition.
//!
//! An item's SKU is its category prefix followed by the codes of every
//! attribute visible in SKUs, in slot order: the five fixed slots first, then
//! custom types by `(sort_order, created_at)`. Its name is the category name
//! followed by the display names of attributes visible in names, inflected by
//! the category's grammatical gender.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use warehouse_entity::attribute::{Attribute, AttributeType, FixedSlot};
use warehouse_entity::category::{Category, CategoryGender};
use warehouse_entity::item::{AttributeCodes, ItemData};

/// Output of [`generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    /// Upper-cased SKU, absent when the category has no prefix.
    pub sku: Option<String>,
    /// Composed display name.
    pub name: String,
}

/// Snapshot of the attribute dictionary used by the generator.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Types keyed by slug.
    types: HashMap<String, AttributeType>,
    /// Custom type slugs in generation order.
    custom_order: Vec<String>,
    /// Attributes keyed by `(type_slug, code)`.
    attributes: HashMap<(String, String), Attribute>,
}

impl Dictionary {
    /// Build a dictionary from every type and attribute.
    pub fn new(types: Vec<AttributeType>, attributes: Vec<Attribute>) -> Self {
        let mut custom: Vec<&AttributeType> = types
            .iter()
            .filter(|t| FixedSlot::from_type_slug(&t.slug).is_none())
            .collect();
        custom.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        let custom_order = custom.into_iter().map(|t| t.slug.clone()).collect();

        Self {
            custom_order,
            types: types.into_iter().map(|t| (t.slug.clone(), t)).collect(),
            attributes: attributes
                .into_iter()
                .map(|a| ((a.type_slug.clone(), a.code.clone()), a))
                .collect(),
        }
    }

    /// Custom type slugs in generation order.
    pub fn custom_types(&self) -> &[String] {
        &self.custom_order
    }

    /// Attribute with `code` in `type_slug`.
    pub fn lookup(&self, type_slug: &str, code: &str) -> Option<&Attribute> {
        self.attributes
            .get(&(type_slug.to_string(), code.to_string()))
    }

    /// Whether a code is written into SKUs.
    ///
    /// Codes without a dictionary entry fall back to the type default.
    pub fn visible_in_sku(&self, type_slug: &str, code: &str) -> bool {
        let type_default = self.types.get(type_slug).map(|t| t.show_in_sku);
        match self.lookup(type_slug, code) {
            Some(attr) => attr.visible_in_sku(type_default),
            None => type_default.unwrap_or(true),
        }
    }

    /// Name segment for a code, or `None` when hidden from names.
    ///
    /// Unknown codes appear verbatim.
    pub fn name_segment(&self, type_slug: &str, code: &str, gender: CategoryGender) -> Option<String> {
        let type_default = self.types.get(type_slug).map(|t| t.show_in_name);
        let Some(attr) = self.lookup(type_slug, code) else {
            return type_default.unwrap_or(true).then(|| code.to_string());
        };
        if !attr.visible_in_name(type_default) {
            return None;
        }

        let inflected = match gender {
            CategoryGender::Feminine => attr.meta.fem.as_deref(),
            CategoryGender::Neuter => attr.meta.neut.as_deref(),
            CategoryGender::Masculine => None,
        };
        Some(
            inflected
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(&attr.name)
                .to_string(),
        )
    }
}

/// Compose the SKU and name of `item` placed in `category`.
pub fn generate(item: &ItemData, category: &Category, dictionary: &Dictionary) -> Generated {
    let sku = category.sku_prefix().map(|prefix| {
        let mut parts = vec![prefix.to_string()];
        for slot in FixedSlot::SKU_ORDER {
            if let Some(code) = item.slot_code(slot) {
                if dictionary.visible_in_sku(slot.type_slug(), code) {
                    parts.push(code.to_string());
                }
            }
        }
        for slug in dictionary.custom_types() {
            if let Some(code) = item.custom_code(slug) {
                if dictionary.visible_in_sku(slug, code) {
                    parts.push(code.to_string());
                }
            }
        }
        parts.join("-").to_uppercase()
    });

    let mut parts = Vec::new();
    if category.show_in_name {
        parts.push(category.name.trim().to_string());
    }
    for slot in FixedSlot::NAME_ORDER {
        if let Some(code) = item.slot_code(slot) {
            parts.extend(dictionary.name_segment(slot.type_slug(), code, category.gender));
        }
    }
    for slug in dictionary.custom_types() {
        if let Some(code) = item.custom_code(slug) {
            parts.extend(dictionary.name_segment(slug, code, category.gender));
        }
    }
    parts.retain(|p| !p.is_empty());

    Generated {
        sku,
        name: parts.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;
    use sqlx::types::Json;
    use uuid::Uuid;

    use warehouse_entity::attribute::AttributeMeta;
    use warehouse_entity::item::ItemType;

    use super::*;

    fn category(prefix: Option<&str>, gender: CategoryGender) -> Category {
        Category {
            id: Uuid::from_u128(1),
            name: "Футболка".to_string(),
            description: None,
            icon: None,
            color: None,
            prefix: prefix.map(str::to_string),
            parent_id: None,
            sort_order: 0,
            is_active: true,
            is_system: false,
            gender,
            singular_name: None,
            plural_name: None,
            default_unit: None,
            slug: None,
            full_path: None,
            show_in_sku: true,
            show_in_name: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn attr_type(slug: &str, sort_order: i32, show_in_sku: bool) -> AttributeType {
        AttributeType {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: slug.to_string(),
            is_system: false,
            sort_order,
            category_id: None,
            show_in_sku,
            show_in_name: true,
            created_at: Utc::now() + Duration::seconds(i64::from(sort_order)),
            updated_at: Utc::now(),
        }
    }

    fn attr(type_slug: &str, code: &str, name: &str, meta: AttributeMeta) -> Attribute {
        Attribute {
            id: Uuid::new_v4(),
            type_slug: type_slug.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            meta: Json(meta),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item() -> ItemData {
        ItemData {
            name: String::new(),
            sku: None,
            category_id: Some(Uuid::from_u128(1)),
            item_type: ItemType::Clothing,
            unit: "шт".to_string(),
            low_stock_threshold: 10,
            critical_stock_threshold: 2,
            description: None,
            brand_code: Some("ms".to_string()),
            quality_code: Some("PRM".to_string()),
            material_code: Some("CTN".to_string()),
            color_code: Some("BLU".to_string()),
            size_code: Some("XL".to_string()),
            attributes: json!({ "print": "DTF" }),
            image: None,
            image_back: None,
            image_side: None,
            image_details: json!([]),
            cost_price: Some(Decimal::new(1000, 2)),
            selling_price: None,
        }
    }

    fn dictionary() -> Dictionary {
        Dictionary::new(
            vec![
                attr_type("brand", 0, true),
                attr_type("quality", 0, true),
                attr_type("material", 0, true),
                attr_type("color", 0, true),
                attr_type("size", 0, true),
                attr_type("print", 1, true),
            ],
            vec![
                attr("brand", "ms", "MS", AttributeMeta::default()),
                attr("quality", "PRM", "Премиум", AttributeMeta::default()),
                attr(
                    "color",
                    "BLU",
                    "Синий",
                    AttributeMeta {
                        fem: Some("Синяя".to_string()),
                        neut: Some("Синее".to_string()),
                        ..AttributeMeta::default()
                    },
                ),
                attr("size", "XL", "XL", AttributeMeta::default()),
                attr("print", "DTF", "DTF-печать", AttributeMeta::default()),
            ],
        )
    }

    #[test]
    fn test_full_sku_in_slot_order() {
        let generated = generate(&item(), &category(Some("ts"), CategoryGender::Masculine), &dictionary());
        assert_eq!(generated.sku.as_deref(), Some("TS-MS-PRM-CTN-BLU-XL-DTF"));
    }

    #[test]
    fn test_no_prefix_no_sku() {
        let generated = generate(&item(), &category(None, CategoryGender::Masculine), &dictionary());
        assert_eq!(generated.sku, None);
        assert!(!generated.name.is_empty());

        let blank = generate(&item(), &category(Some("  "), CategoryGender::Masculine), &dictionary());
        assert_eq!(blank.sku, None);
    }

    #[test]
    fn test_name_skips_material_and_inflects() {
        let dict = dictionary();
        let masculine = generate(&item(), &category(Some("TS"), CategoryGender::Masculine), &dict);
        assert_eq!(masculine.name, "Футболка MS Премиум Синий XL DTF-печать");

        let feminine = generate(&item(), &category(Some("TS"), CategoryGender::Feminine), &dict);
        assert_eq!(feminine.name, "Футболка MS Премиум Синяя XL DTF-печать");

        let neuter = generate(&item(), &category(Some("TS"), CategoryGender::Neuter), &dict);
        assert!(neuter.name.contains("Синее"));
    }

    #[test]
    fn test_unknown_codes_appear_verbatim() {
        let mut data = item();
        data.size_code = Some("XXXL".to_string());
        let generated = generate(&data, &category(Some("TS"), CategoryGender::Masculine), &dictionary());
        assert!(generated.name.ends_with("XXXL DTF-печать"));
        assert!(generated.sku.unwrap().contains("-XXXL-"));
    }

    #[test]
    fn test_hidden_codes_never_reach_the_sku() {
        let types = vec![
            attr_type("brand", 0, true),
            attr_type("quality", 0, false),
            attr_type("material", 0, true),
            attr_type("color", 0, true),
            attr_type("size", 0, true),
            attr_type("print", 1, true),
        ];
        let dict = Dictionary::new(
            types,
            vec![
                // Value override hides a code of a visible type.
                attr(
                    "color",
                    "BLU",
                    "Синий",
                    AttributeMeta {
                        show_in_sku: Some(false),
                        ..AttributeMeta::default()
                    },
                ),
                // Value override shows a code of a hidden type.
                attr(
                    "quality",
                    "PRM",
                    "Премиум",
                    AttributeMeta {
                        show_in_sku: Some(true),
                        ..AttributeMeta::default()
                    },
                ),
                attr("size", "XL", "XL", AttributeMeta::default()),
            ],
        );

        let generated = generate(&item(), &category(Some("TS"), CategoryGender::Masculine), &dict);
        let sku = generated.sku.unwrap();
        assert_eq!(sku, "TS-MS-PRM-CTN-XL-DTF");
        for segment in sku.split('-').skip(1) {
            let hidden = ["color", "quality", "material", "size", "brand", "print"]
                .iter()
                .any(|slug| dict.lookup(slug, segment).is_some() && !dict.visible_in_sku(slug, segment));
            assert!(!hidden, "{segment} should be hidden");
        }
    }

    #[test]
    fn test_hidden_from_name() {
        let dict = Dictionary::new(
            vec![attr_type("quality", 0, true)],
            vec![attr(
                "quality",
                "PRM",
                "Премиум",
                AttributeMeta {
                    show_in_name: Some(false),
                    ..AttributeMeta::default()
                },
            )],
        );
        let generated = generate(&item(), &category(Some("TS"), CategoryGender::Masculine), &dict);
        assert!(!generated.name.contains("Премиум"));
    }

    #[test]
    fn test_custom_types_follow_sort_order() {
        let mut data = item();
        data.attributes = json!({ "print": "DTF", "fit": "OVR" });
        let dict = Dictionary::new(
            vec![attr_type("print", 2, true), attr_type("fit", 1, true)],
            Vec::new(),
        );
        assert_eq!(dict.custom_types(), ["fit".to_string(), "print".to_string()]);

        let generated = generate(&data, &category(Some("TS"), CategoryGender::Masculine), &dict);
        assert!(generated.sku.unwrap().ends_with("-OVR-DTF"));
    }
}
