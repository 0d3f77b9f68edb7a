//! Transit routes and the display metadata derived for them at load time.

use crate::{RouteId, StopId};

/// Palette cycled over routes that arrive without an explicit color.
const ROUTE_COLORS: [&str; 12] = [
    "#E91E63", "#9C27B0", "#3F51B5", "#2196F3", "#00BCD4", "#4CAF50", "#8BC34A", "#CDDC39",
    "#FF9800", "#FF5722", "#795548", "#607D8B",
];

/// Route numbers that are bus lines despite carrying no `b` prefix.
const UNPREFIXED_BUS_NUMBERS: [&str; 5] = ["17", "18", "22", "33", "41"];

/// Vehicle class inferred from the route number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Bus,
    Minibus,
    Trolleybus,
}

impl TransportKind {
    /// Classifies by the number prefix (`b`/`m`/`t`); plain numbers default
    /// to minibus except the known unprefixed bus lines.
    pub fn from_route_number(number: &str) -> Self {
        let number = number.trim();
        match number.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('b') => return Self::Bus,
            Some('m') => return Self::Minibus,
            Some('t') => return Self::Trolleybus,
            _ => {}
        }
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        if UNPREFIXED_BUS_NUMBERS.contains(&digits.as_str()) {
            Self::Bus
        } else {
            Self::Minibus
        }
    }
}

/// One transit line: derived from the raw route record during model build,
/// the input record itself is never mutated.
#[derive(Debug, Clone)]
pub struct TransitRoute {
    pub id: RouteId,
    pub name: String,
    /// Display color, assigned from the palette when the feed omits one
    pub color: String,
    pub kind: TransportKind,
    /// Ordered stop ids as published. Entries that do not resolve against
    /// the stop index stay here for display but contribute no graph edges.
    pub stop_ids: Vec<StopId>,
}

impl TransitRoute {
    /// Leading token of the route name, e.g. `b17` in `"b17 Вокзал — Сино"`.
    pub fn number(&self) -> &str {
        route_number(&self.name)
    }
}

pub(crate) fn route_number(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

pub(crate) fn default_color(index: usize) -> &'static str {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_prefix() {
        assert_eq!(TransportKind::from_route_number("b17"), TransportKind::Bus);
        assert_eq!(TransportKind::from_route_number("m5"), TransportKind::Minibus);
        assert_eq!(TransportKind::from_route_number("t3"), TransportKind::Trolleybus);
    }

    #[test]
    fn test_kind_unprefixed() {
        // Known bus lines keep their class without a prefix
        assert_eq!(TransportKind::from_route_number("17"), TransportKind::Bus);
        assert_eq!(TransportKind::from_route_number("11"), TransportKind::Minibus);
        assert_eq!(TransportKind::from_route_number(""), TransportKind::Minibus);
    }

    #[test]
    fn test_route_number_is_leading_token() {
        assert_eq!(route_number("b17 Вокзал — Аэропорт"), "b17");
        assert_eq!(route_number("33"), "33");
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(default_color(0), default_color(ROUTE_COLORS.len()));
        assert_ne!(default_color(0), default_color(1));
    }
}
