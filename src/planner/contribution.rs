use crate::models::formula::{FormulaReference, FormulaRole};
use crate::models::nutrient::{ENERGY, PROTEIN};
use crate::models::plan::{CalculationInputs, FormulaContribution};
use crate::planner::composite::resolve_composite_value;
use crate::planner::constants::{BASIS_QUANTITY, MIN_FEEDS_PER_DAY, MIN_SCOOP_SIZE_G};

/// Preparation settings with the engine's own clamps applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepSettings {
    pub weight_kg: f64,
    pub feeds_per_day: u32,
    pub scoop_size_g: f64,
    pub water_per_scoop_ml: f64,
}

impl PrepSettings {
    /// Normalize caller-supplied numbers to safe values.
    ///
    /// Non-finite weights and water volumes become 0; scoop size is floored at
    /// [`MIN_SCOOP_SIZE_G`] and feeds at [`MIN_FEEDS_PER_DAY`].
    pub fn from_inputs(inputs: &CalculationInputs) -> Self {
        Self {
            weight_kg: floor_at(inputs.weight_kg, 0.0),
            feeds_per_day: inputs.feeds_per_day.max(MIN_FEEDS_PER_DAY),
            scoop_size_g: floor_at(inputs.scoop_size_g, MIN_SCOOP_SIZE_G),
            water_per_scoop_ml: floor_at(inputs.water_per_scoop_ml, 0.0),
        }
    }

    #[inline]
    fn feeds(&self) -> f64 {
        self.feeds_per_day as f64
    }
}

/// `value` if it is a finite number at or above `floor`, otherwise `floor`.
#[inline]
fn floor_at(value: f64, floor: f64) -> f64 {
    if value.is_finite() { value.max(floor) } else { floor }
}

/// Content of `key` per 100 basis units, resolving composite keys.
#[inline]
pub fn per_basis(formula: &FormulaReference, key: &str) -> Option<f64> {
    resolve_composite_value(key, &formula.values)
}

/// Amount of a nutrient delivered by `amount` of a formula with `per_100` content.
#[inline]
pub fn delivered(per_100: f64, amount: f64) -> f64 {
    per_100 * amount / BASIS_QUANTITY
}

/// Compute what `amount` of a formula delivers and how to prepare it.
///
/// Scoop and water fields are only filled for powders; liquids are measured
/// directly by volume.
pub fn make_contribution(
    role: FormulaRole,
    formula: &FormulaReference,
    amount: f64,
    settings: &PrepSettings,
    primary_limiter: Option<&str>,
) -> FormulaContribution {
    let kcal = delivered(formula.value(ENERGY).unwrap_or(0.0), amount);
    let protein = delivered(formula.value(PROTEIN).unwrap_or(0.0), amount);
    let primary_limiter_delivered = primary_limiter
        .and_then(|key| per_basis(formula, key))
        .map(|per_100| delivered(per_100, amount));

    let (scoops, water_ml) = if formula.basis.is_powder() && settings.scoop_size_g > 0.0 {
        let scoops = amount / settings.scoop_size_g;
        (Some(scoops), Some(scoops * settings.water_per_scoop_ml))
    } else {
        (None, None)
    };

    FormulaContribution {
        role,
        formula_name: formula.name.clone(),
        basis: formula.basis,
        amount,
        amount_unit: formula.basis.amount_unit(),
        kcal,
        protein,
        primary_limiter_delivered,
        scoops,
        water_ml,
        per_feed_amount: amount / settings.feeds(),
        per_feed_scoops: scoops.map(|s| s / settings.feeds()),
        per_feed_water_ml: water_ml.map(|w| w / settings.feeds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::formula::Basis;
    use crate::models::unit::DailyUnit;

    fn settings() -> PrepSettings {
        PrepSettings {
            weight_kg: 4.0,
            feeds_per_day: 8,
            scoop_size_g: 5.0,
            water_per_scoop_ml: 30.0,
        }
    }

    fn powder() -> FormulaReference {
        FormulaReference::new(
            "Standard Powder",
            Basis::Per100G,
            &[
                ("Energy", 500.0),
                ("Protein", 11.0),
                ("Phenylalanine", 400.0),
                ("Tyrosine", 300.0),
            ],
        )
    }

    #[test]
    fn test_powder_contribution() {
        let c = make_contribution(
            FormulaRole::Standard,
            &powder(),
            60.0,
            &settings(),
            Some("Phenylalanine"),
        );

        assert_eq!(c.amount_unit, DailyUnit::GPerDay);
        assert!((c.kcal - 300.0).abs() < 1e-9);
        assert!((c.protein - 6.6).abs() < 1e-9);
        assert!((c.primary_limiter_delivered.unwrap() - 240.0).abs() < 1e-9);
        assert_eq!(c.scoops, Some(12.0));
        assert_eq!(c.water_ml, Some(360.0));
        assert_eq!(c.per_feed_scoops, Some(1.5));
        assert_eq!(c.per_feed_water_ml, Some(45.0));
        assert_eq!(c.per_feed_amount, 7.5);
    }

    #[test]
    fn test_composite_limiter_per_formula() {
        let c = make_contribution(
            FormulaRole::Standard,
            &powder(),
            50.0,
            &settings(),
            Some("Phenylalanine+Tyrosine"),
        );
        assert!((c.primary_limiter_delivered.unwrap() - 350.0).abs() < 1e-9);

        let c = make_contribution(
            FormulaRole::Standard,
            &powder(),
            50.0,
            &settings(),
            Some("Phenylalanine+Leucine"),
        );
        assert_eq!(c.primary_limiter_delivered, None);
    }

    #[test]
    fn test_liquid_has_no_scoops() {
        let liquid = FormulaReference::new(
            "Ready to Feed",
            Basis::Per100Ml,
            &[("Energy", 67.0), ("Protein", 1.4)],
        );
        let c = make_contribution(FormulaRole::Standard, &liquid, 600.0, &settings(), None);

        assert_eq!(c.amount_unit, DailyUnit::MlPerDay);
        assert_eq!(c.scoops, None);
        assert_eq!(c.water_ml, None);
        assert_eq!(c.per_feed_scoops, None);
        assert!((c.kcal - 402.0).abs() < 1e-9);
        assert_eq!(c.per_feed_amount, 75.0);
    }

    #[test]
    fn test_missing_energy_counts_as_zero() {
        let bare = FormulaReference::new("Bare", Basis::Per100G, &[("Protein", 80.0)]);
        let c = make_contribution(FormulaRole::Special, &bare, 10.0, &settings(), None);
        assert_eq!(c.kcal, 0.0);
        assert_eq!(c.protein, 8.0);
        assert_eq!(c.primary_limiter_delivered, None);
    }
}
