//! Attribute type and attribute value models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A dictionary group such as "color" or "size".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttributeType {
    /// Unique identifier.
    pub id: Uuid,
    /// Machine name, `[a-z0-9_]` only. Referenced by [`Attribute::type_slug`].
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Protected types need an admin password to delete.
    pub is_system: bool,
    /// Position among custom types in generated SKUs and names.
    pub sort_order: i32,
    /// Restricts the type to one category when set.
    pub category_id: Option<Uuid>,
    /// Default SKU visibility for values of this type.
    pub show_in_sku: bool,
    /// Default name visibility for values of this type.
    pub show_in_name: bool,
    /// When the type was created.
    pub created_at: DateTime<Utc>,
    /// When the type was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Display metadata and per-value visibility overrides of an attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMeta {
    /// Swatch color for color attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    /// Feminine name form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fem: Option<String>,
    /// Neuter name form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neut: Option<String>,
    /// Overrides the type's SKU visibility when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_sku: Option<bool>,
    /// Overrides the type's name visibility when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_name: Option<bool>,
}

/// A value within an attribute type, e.g. "Blue" with code "BLU".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attribute {
    /// Unique identifier.
    pub id: Uuid,
    /// Slug of the owning [`AttributeType`].
    pub type_slug: String,
    /// Display name.
    pub name: String,
    /// Code written into items and SKUs. Unique within the type.
    pub code: String,
    /// Display metadata and visibility overrides.
    pub meta: Json<AttributeMeta>,
    /// When the attribute was created.
    pub created_at: DateTime<Utc>,
    /// When the attribute was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AttributeType {
    /// Normalize a user-supplied slug: lowercase, anything outside
    /// `[a-z0-9_]` becomes `_`.
    pub fn normalize_slug(raw: &str) -> String {
        raw.trim()
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl Attribute {
    /// Effective SKU visibility given the owning type's default.
    pub fn visible_in_sku(&self, type_default: Option<bool>) -> bool {
        self.meta.show_in_sku.or(type_default).unwrap_or(true)
    }

    /// Effective name visibility given the owning type's default.
    pub fn visible_in_name(&self, type_default: Option<bool>) -> bool {
        self.meta.show_in_name.or(type_default).unwrap_or(true)
    }
}

/// Writable columns of an attribute type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeTypeData {
    /// Normalized slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Protected flag.
    pub is_system: bool,
    /// Position among custom types.
    pub sort_order: i32,
    /// Category restriction.
    pub category_id: Option<Uuid>,
    /// Default SKU visibility.
    pub show_in_sku: bool,
    /// Default name visibility.
    pub show_in_name: bool,
}

/// Writable columns of an attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeData {
    /// Owning type slug.
    pub type_slug: String,
    /// Display name.
    pub name: String,
    /// Code, unique within the type.
    pub code: String,
    /// Display metadata.
    pub meta: AttributeMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(meta: AttributeMeta) -> Attribute {
        Attribute {
            id: Uuid::nil(),
            type_slug: "color".to_string(),
            name: "Blue".to_string(),
            code: "BLU".to_string(),
            meta: Json(meta),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(AttributeType::normalize_slug(" Print Type "), "print_type");
        assert_eq!(AttributeType::normalize_slug("fit-2024"), "fit_2024");
        assert_eq!(AttributeType::normalize_slug("Ткань"), "_____");
    }

    #[test]
    fn test_value_override_beats_type_default() {
        let hidden = attribute(AttributeMeta {
            show_in_sku: Some(false),
            ..AttributeMeta::default()
        });
        assert!(!hidden.visible_in_sku(Some(true)));

        let inherit = attribute(AttributeMeta::default());
        assert!(!inherit.visible_in_sku(Some(false)));
        assert!(inherit.visible_in_sku(None));
        assert!(inherit.visible_in_name(None));
    }

    #[test]
    fn test_meta_uses_camel_case_keys() {
        let meta: AttributeMeta =
            serde_json::from_str(r##"{"hex":"#0000ff","showInSku":false}"##).unwrap();
        assert_eq!(meta.hex.as_deref(), Some("#0000ff"));
        assert_eq!(meta.show_in_sku, Some(false));
        assert_eq!(meta.show_in_name, None);
    }
}
