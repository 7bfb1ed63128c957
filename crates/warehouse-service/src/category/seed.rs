//! Built-in category tree inserted by the seed operation.

use warehouse_entity::category::CategoryGender;

/// A protected category definition.
#[derive(Debug, Clone, Copy)]
pub struct SystemCategory {
    /// Display name, also the lookup key.
    pub name: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// Color token.
    pub color: &'static str,
    /// Description shown in the catalogue.
    pub description: Option<&'static str>,
    /// SKU prefix.
    pub prefix: Option<&'static str>,
    /// Grammatical gender.
    pub gender: CategoryGender,
    /// Singular form.
    pub singular_name: Option<&'static str>,
    /// Plural form, also matched when looking up existing rows.
    pub plural_name: Option<&'static str>,
}

const fn root(name: &'static str, icon: &'static str, color: &'static str, description: &'static str) -> SystemCategory {
    SystemCategory {
        name,
        icon,
        color,
        description: Some(description),
        prefix: None,
        gender: CategoryGender::Masculine,
        singular_name: None,
        plural_name: None,
    }
}

const fn garment(
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    prefix: &'static str,
    plural: &'static str,
    gender: CategoryGender,
) -> SystemCategory {
    SystemCategory {
        name,
        icon,
        color,
        description: None,
        prefix: Some(prefix),
        gender,
        singular_name: Some(name),
        plural_name: Some(plural),
    }
}

/// Name of the root that parents [`GARMENTS`].
pub const CLOTHING: &str = "Одежда";

/// Root categories.
pub const ROOTS: [SystemCategory; 4] = [
    root(CLOTHING, "shirt", "primary", "Одежда и текстильные изделия"),
    root("Упаковка", "box", "amber", "Упаковочные материалы"),
    root("Расходники", "scissors", "rose", "Расходные материалы для производства"),
    root("Без категории", "help-circle", "slate", "Позиции без привязки к категории"),
];

/// Garment subcategories placed under [`CLOTHING`].
pub const GARMENTS: [SystemCategory; 9] = [
    garment("Футболка", "shirt", "primary", "TS", "Футболки", CategoryGender::Feminine),
    garment("Худи", "hourglass", "primary", "HD", "Худи", CategoryGender::Neuter),
    garment("Свитшот", "layers", "violet", "SW", "Свитшоты", CategoryGender::Masculine),
    garment("Лонгслив", "shirt", "emerald", "LS", "Лонгсливы", CategoryGender::Masculine),
    garment("Анорак", "wind", "cyan", "AN", "Анораки", CategoryGender::Masculine),
    garment("Зип-худи", "zap", "primary", "ZH", "Зип-худи", CategoryGender::Neuter),
    garment("Штаны", "package", "slate", "PT", "Штаны", CategoryGender::Masculine),
    garment("Поло", "shirt", "cyan", "PL", "Поло", CategoryGender::Neuter),
    garment("Кепка", "box", "cyan", "CP", "Кепки", CategoryGender::Feminine),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_prefixes_and_names_unique() {
        let prefixes: HashSet<_> = GARMENTS.iter().filter_map(|g| g.prefix).collect();
        assert_eq!(prefixes.len(), GARMENTS.len());

        let names: HashSet<_> = ROOTS.iter().chain(GARMENTS.iter()).map(|c| c.name).collect();
        assert_eq!(names.len(), ROOTS.len() + GARMENTS.len());
        assert!(ROOTS.iter().any(|r| r.name == CLOTHING));
    }
}
