//! Category entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Grammatical gender of a category name, used to inflect attribute names
/// when composing item names ("Синяя футболка" vs "Синий свитер").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "category_gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CategoryGender {
    /// Masculine (default).
    #[default]
    Masculine,
    /// Feminine.
    Feminine,
    /// Neuter.
    Neuter,
}

/// A node in the inventory category hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique category identifier.
    pub id: Uuid,
    /// Display name (unique).
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Icon name for the UI.
    pub icon: Option<String>,
    /// Color token for the UI.
    pub color: Option<String>,
    /// SKU prefix. Items in categories without a prefix get no generated SKU.
    pub prefix: Option<String>,
    /// Parent category (null for roots).
    pub parent_id: Option<Uuid>,
    /// Manual ordering; 0 sorts last.
    pub sort_order: i32,
    /// Whether the category is offered for new items.
    pub is_active: bool,
    /// Protected categories need an admin password to delete.
    pub is_system: bool,
    /// Grammatical gender for name inflection.
    pub gender: CategoryGender,
    /// Singular display form.
    pub singular_name: Option<String>,
    /// Plural display form.
    pub plural_name: Option<String>,
    /// Default unit for new items in this category.
    pub default_unit: Option<String>,
    /// URL-safe slug derived from the name.
    pub slug: Option<String>,
    /// Ancestor names joined by `" > "`, including this category.
    pub full_path: Option<String>,
    /// Whether the prefix is written as the first SKU segment.
    pub show_in_sku: bool,
    /// Whether the category name contributes to generated item names.
    pub show_in_name: bool,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// The trimmed SKU prefix, if one is set.
    pub fn sku_prefix(&self) -> Option<&str> {
        self.prefix.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// A category with aggregate counts over its non-archived items.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryWithStats {
    /// The category row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,
    /// Number of non-archived items directly in this category.
    pub item_count: i64,
    /// Sum of those items' quantities.
    pub total_quantity: i64,
}

/// Writable category fields used for inserts and full updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryData {
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Icon name.
    pub icon: Option<String>,
    /// Color token.
    pub color: Option<String>,
    /// SKU prefix.
    pub prefix: Option<String>,
    /// Parent category.
    pub parent_id: Option<Uuid>,
    /// Manual ordering.
    pub sort_order: i32,
    /// Active flag.
    pub is_active: bool,
    /// Protected flag.
    pub is_system: bool,
    /// Grammatical gender.
    pub gender: CategoryGender,
    /// Singular display form.
    pub singular_name: Option<String>,
    /// Plural display form.
    pub plural_name: Option<String>,
    /// Default unit for new items.
    pub default_unit: Option<String>,
    /// URL-safe slug.
    pub slug: Option<String>,
    /// Precomputed full path.
    pub full_path: String,
    /// Prefix visibility in SKUs.
    pub show_in_sku: bool,
    /// Name visibility in item names.
    pub show_in_name: bool,
}
