use crate::models::unit::{DailyUnit, Unit};

/// Collapse a guideline unit and its per-kilogram counterpart to one daily unit.
pub fn to_daily_unit(unit: Unit) -> DailyUnit {
    match unit {
        Unit::MgPerKgDay | Unit::MgPerDay => DailyUnit::MgPerDay,
        Unit::GPerKgDay | Unit::GPerDay => DailyUnit::GPerDay,
        Unit::KcalPerKgDay | Unit::KcalPerDay => DailyUnit::KcalPerDay,
        Unit::MlPerKgDay | Unit::MlPerDay => DailyUnit::MlPerDay,
        Unit::PercentEnergy => DailyUnit::PercentEnergy,
    }
}

/// Convert a guideline value to an absolute daily amount.
///
/// Weight-relative units are multiplied by `weight_kg`; absolute units pass through.
#[inline]
pub fn to_daily_value(value: f64, unit: Unit, weight_kg: f64) -> f64 {
    if unit.is_per_kg() {
        value * weight_kg
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_kg_scales_by_weight() {
        assert_eq!(to_daily_value(20.0, Unit::MgPerKgDay, 4.0), 80.0);
        assert_eq!(to_daily_value(3.0, Unit::GPerKgDay, 4.0), 12.0);
        assert_eq!(to_daily_value(150.0, Unit::MlPerKgDay, 3.5), 525.0);
    }

    #[test]
    fn test_absolute_passes_through() {
        assert_eq!(to_daily_value(500.0, Unit::KcalPerDay, 12.0), 500.0);
        assert_eq!(to_daily_value(35.0, Unit::PercentEnergy, 12.0), 35.0);
    }

    #[test]
    fn test_daily_unit_families() {
        assert_eq!(to_daily_unit(Unit::MgPerKgDay), DailyUnit::MgPerDay);
        assert_eq!(to_daily_unit(Unit::MgPerDay), DailyUnit::MgPerDay);
        assert_eq!(to_daily_unit(Unit::KcalPerKgDay), DailyUnit::KcalPerDay);
        assert_eq!(to_daily_unit(Unit::PercentEnergy), DailyUnit::PercentEnergy);
    }
}
