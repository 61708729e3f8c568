use std::collections::BTreeMap;

use crate::models::nutrient::{COMPOSITE_SEPARATOR, key_parts};

/// Sparse lookup from nutrient key to a value.
///
/// Formula value tables and resolved target tables share this, so composite
/// keys resolve the same way against both.
pub trait NutrientLookup<T> {
    fn lookup(&self, key: &str) -> Option<T>;
}

impl<T: Copy> NutrientLookup<T> for BTreeMap<String, T> {
    fn lookup(&self, key: &str) -> Option<T> {
        self.get(key).copied()
    }
}

/// Resolve a simple or `+`-joined composite key.
///
/// A composite sums its parts only when every part is present; a partial sum
/// would understate the combined limit, so it resolves to `None` instead.
pub fn resolve_composite_value<L>(key: &str, values: &L) -> Option<f64>
where
    L: NutrientLookup<f64> + ?Sized,
{
    if let Some(value) = values.lookup(key) {
        return Some(value);
    }
    if !key.contains(COMPOSITE_SEPARATOR) {
        return None;
    }
    key_parts(key).map(|part| values.lookup(part)).sum()
}

/// Display unit for a possibly composite key: the first part's unit, else `default`.
pub fn resolve_unit_for_composite<U, L>(key: &str, units: &L, default: U) -> U
where
    U: Copy,
    L: NutrientLookup<U> + ?Sized,
{
    if let Some(unit) = units.lookup(key) {
        return unit;
    }
    key_parts(key)
        .next()
        .and_then(|first| units.lookup(first))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::unit::DailyUnit;

    fn table<T: Copy>(entries: &[(&str, T)]) -> BTreeMap<String, T> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_direct_key() {
        let values = table(&[("Leucine", 1060.0)]);
        assert_eq!(resolve_composite_value("Leucine", &values), Some(1060.0));
        assert_eq!(resolve_composite_value("Valine", &values), None);
    }

    #[test]
    fn test_composite_sums_all_parts() {
        let values = table(&[("A", 2.0), ("B", 3.0)]);
        assert_eq!(resolve_composite_value("A+B", &values), Some(5.0));
        assert_eq!(resolve_composite_value("A + B", &values), Some(5.0));
    }

    #[test]
    fn test_partial_composite_is_none() {
        let values = table(&[("A", 2.0)]);
        assert_eq!(resolve_composite_value("A+B", &values), None);
    }

    #[test]
    fn test_direct_composite_entry_wins() {
        let values = table(&[("A", 2.0), ("B", 3.0), ("A+B", 4.0)]);
        assert_eq!(resolve_composite_value("A+B", &values), Some(4.0));
    }

    #[test]
    fn test_zero_parts_still_resolve() {
        let values = table(&[("A", 0.0), ("B", 0.0)]);
        assert_eq!(resolve_composite_value("A+B", &values), Some(0.0));
    }

    #[test]
    fn test_unit_for_composite() {
        let units = table(&[("A", DailyUnit::MgPerDay), ("Protein", DailyUnit::GPerDay)]);
        assert_eq!(
            resolve_unit_for_composite("A+B", &units, DailyUnit::GPerDay),
            DailyUnit::MgPerDay
        );
        assert_eq!(
            resolve_unit_for_composite("Protein", &units, DailyUnit::MgPerDay),
            DailyUnit::GPerDay
        );
        assert_eq!(
            resolve_unit_for_composite("C+A", &units, DailyUnit::GPerDay),
            DailyUnit::GPerDay
        );
    }
}
