//! Built-in attribute types and values.

use warehouse_entity::attribute::{AttributeMeta, FixedSlot};

/// Display names of the fixed-slot types.
pub fn system_type_name(slot: FixedSlot) -> &'static str {
    match slot {
        FixedSlot::Brand => "Бренд",
        FixedSlot::Quality => "Качество",
        FixedSlot::Material => "Материал",
        FixedSlot::Color => "Цвет",
        FixedSlot::Size => "Размер",
    }
}

/// A built-in attribute value.
#[derive(Debug, Clone, Copy)]
pub struct SystemAttribute {
    /// Owning slot.
    pub slot: FixedSlot,
    /// Display name.
    pub name: &'static str,
    /// Code.
    pub code: &'static str,
    /// Swatch color.
    pub hex: Option<&'static str>,
}

impl SystemAttribute {
    /// Metadata stored with the value.
    pub fn meta(&self) -> AttributeMeta {
        AttributeMeta {
            hex: self.hex.map(str::to_string),
            ..AttributeMeta::default()
        }
    }
}

const fn value(slot: FixedSlot, name: &'static str, code: &'static str) -> SystemAttribute {
    SystemAttribute {
        slot,
        name,
        code,
        hex: None,
    }
}

const fn color(name: &'static str, code: &'static str, hex: &'static str) -> SystemAttribute {
    SystemAttribute {
        slot: FixedSlot::Color,
        name,
        code,
        hex: Some(hex),
    }
}

/// Values inserted when missing.
pub const SYSTEM_ATTRIBUTES: [SystemAttribute; 17] = [
    value(FixedSlot::Brand, "Muse Wear", "MSW"),
    color("Белый", "WHT", "#FFFFFF"),
    color("Черный", "BLK", "#000000"),
    color("Молочный", "MILK", "#F5F5DC"),
    color("Шоколад", "CHOC", "#7B3F00"),
    color("Графит", "GRAF", "#383838"),
    color("Баблгам", "BUB", "#FFC1CC"),
    value(FixedSlot::Size, "Kids", "KDS"),
    value(FixedSlot::Size, "S", "S"),
    value(FixedSlot::Size, "M", "M"),
    value(FixedSlot::Size, "S-M", "SM"),
    value(FixedSlot::Size, "L", "L"),
    value(FixedSlot::Size, "XL", "XL"),
    value(FixedSlot::Material, "Кулирка", "KUL"),
    value(FixedSlot::Material, "Френч-терри", "FT"),
    value(FixedSlot::Quality, "Base", "BS"),
    value(FixedSlot::Quality, "Premium", "PRM"),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_codes_unique_per_slot() {
        let keys: HashSet<_> = SYSTEM_ATTRIBUTES.iter().map(|a| (a.slot, a.code)).collect();
        assert_eq!(keys.len(), SYSTEM_ATTRIBUTES.len());
    }

    #[test]
    fn test_only_colors_carry_swatches() {
        for attr in &SYSTEM_ATTRIBUTES {
            assert_eq!(attr.hex.is_some(), attr.slot == FixedSlot::Color, "{}", attr.code);
        }
    }
}
