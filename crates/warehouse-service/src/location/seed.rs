//! Storage locations inserted by the seed operation.

use warehouse_entity::location::LocationKind;

/// A location created when missing, looked up by name.
#[derive(Debug, Clone, Copy)]
pub struct SeedLocation {
    /// Display name, also the lookup key.
    pub name: &'static str,
    /// Street address.
    pub address: &'static str,
    /// Location kind.
    pub kind: LocationKind,
}

/// Production floor and the three pickup points.
pub const LOCATIONS: [SeedLocation; 4] = [
    SeedLocation {
        name: "Производство",
        address: "Пушкина 71",
        kind: LocationKind::Production,
    },
    SeedLocation {
        name: "Стас",
        address: "Роз 355а",
        kind: LocationKind::Warehouse,
    },
    SeedLocation {
        name: "Леня",
        address: "Доваторцев 67",
        kind: LocationKind::Warehouse,
    },
    SeedLocation {
        name: "Денис",
        address: "Тухачевского 26/1",
        kind: LocationKind::Warehouse,
    },
];
