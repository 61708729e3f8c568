use crate::models::nutrient::FLUID;
use crate::models::plan::{BalanceStatus, NutrientBalance, PlanTotals, ResolvedTarget};
use crate::models::unit::DailyUnit;
use crate::planner::allocation::{Allocation, delivered_so_far};
use crate::planner::constants::{EPSILON, atwater_factor};
use crate::planner::targets::TargetTable;

/// Classify a delivered amount against its resolved range.
///
/// Floor-only rows are never reported as high.
pub fn classify(target: &ResolvedTarget, delivered: f64) -> BalanceStatus {
    if delivered < target.total_min - EPSILON {
        return BalanceStatus::Low;
    }
    match target.total_max {
        Some(max) if !target.min_only && delivered > max + EPSILON => BalanceStatus::High,
        _ => BalanceStatus::Normal,
    }
}

/// Share of delivered energy coming from a macronutrient, in percent.
///
/// Nutrients without an energy density fall back to their delivered mass.
fn energy_share(key: &str, items: &[Allocation<'_>], total_kcal: f64) -> f64 {
    let grams = delivered_so_far(key, items);
    match atwater_factor(key) {
        Some(kcal_per_g) if total_kcal > EPSILON => grams * kcal_per_g / total_kcal * 100.0,
        Some(_) => 0.0,
        None => grams,
    }
}

/// Delivered amount of a target's nutrient across all plan items.
pub fn delivered_for(
    target: &ResolvedTarget,
    items: &[Allocation<'_>],
    totals: &PlanTotals,
) -> f64 {
    match target.nutrient.as_str() {
        FLUID => totals.final_volume_ml,
        key if target.total_unit == DailyUnit::PercentEnergy => {
            energy_share(key, items, totals.kcal)
        }
        key => delivered_so_far(key, items),
    }
}

pub fn evaluate_nutrient(
    target: &ResolvedTarget,
    items: &[Allocation<'_>],
    totals: &PlanTotals,
) -> NutrientBalance {
    let delivered = delivered_for(target, items, totals);

    NutrientBalance {
        nutrient: target.nutrient.clone(),
        unit: target.total_unit,
        min: target.total_min,
        max: target.total_max,
        target: target.total_target,
        delivered,
        deficit_to_target: (target.total_target - delivered).max(0.0),
        excess_to_target: (delivered - target.total_target).max(0.0),
        status: classify(target, delivered),
    }
}

/// Score every resolved nutrient against what the plan delivers.
pub fn evaluate_balance(
    targets: &TargetTable,
    items: &[Allocation<'_>],
    totals: &PlanTotals,
) -> Vec<NutrientBalance> {
    targets
        .rows()
        .iter()
        .map(|target| evaluate_nutrient(target, items, totals))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::formula::{Basis, FormulaReference, FormulaRole};
    use crate::planner::contribution::{PrepSettings, make_contribution};
    use crate::planner::totals::summarize;

    fn target(nutrient: &str, min: f64, max: Option<f64>, unit: DailyUnit) -> ResolvedTarget {
        ResolvedTarget {
            nutrient: nutrient.to_string(),
            total_min: min,
            total_max: max,
            total_target: max.map(|m| (min + m) / 2.0).unwrap_or(min),
            total_unit: unit,
            min_only: max.is_none(),
        }
    }

    fn settings() -> PrepSettings {
        PrepSettings {
            weight_kg: 4.0,
            feeds_per_day: 6,
            scoop_size_g: 4.5,
            water_per_scoop_ml: 30.0,
        }
    }

    #[test]
    fn test_classify_thresholds() {
        let t = target("X", 80.0, Some(240.0), DailyUnit::MgPerDay);
        assert_eq!(classify(&t, 79.0), BalanceStatus::Low);
        assert_eq!(classify(&t, 80.0), BalanceStatus::Normal);
        assert_eq!(classify(&t, 240.0), BalanceStatus::Normal);
        assert_eq!(classify(&t, 240.0 + 1e-9), BalanceStatus::Normal);
        assert_eq!(classify(&t, 241.0), BalanceStatus::High);
    }

    #[test]
    fn test_classify_floor_only_never_high() {
        let t = target("Tyrosine", 1200.0, None, DailyUnit::MgPerDay);
        assert_eq!(classify(&t, 99999.0), BalanceStatus::Normal);
        assert_eq!(classify(&t, 10.0), BalanceStatus::Low);

        let mut with_max = target("Tyrosine", 1200.0, Some(1400.0), DailyUnit::MgPerDay);
        with_max.min_only = true;
        assert_eq!(classify(&with_max, 5000.0), BalanceStatus::Normal);
    }

    #[test]
    fn test_fluid_uses_final_volume() {
        let powder = FormulaReference::new("P", Basis::Per100G, &[("Energy", 500.0)]);
        let items = vec![Allocation {
            contribution: make_contribution(
                FormulaRole::Standard,
                &powder,
                90.0,
                &settings(),
                None,
            ),
            source: &powder,
        }];
        let contributions: Vec<_> = items.iter().map(|i| i.contribution.clone()).collect();
        let totals = summarize(&contributions, &settings());

        let fluid = target("Fluid", 500.0, Some(700.0), DailyUnit::MlPerDay);
        let balance = evaluate_nutrient(&fluid, &items, &totals);
        // 90 g / 4.5 g = 20 scoops * 30 mL
        assert!((balance.delivered - 600.0).abs() < 1e-9);
        assert_eq!(balance.status, BalanceStatus::Normal);
        assert_eq!(balance.deficit_to_target, 0.0);
        assert_eq!(balance.excess_to_target, 0.0);
    }

    #[test]
    fn test_energy_share_row() {
        let powder = FormulaReference::new(
            "P",
            Basis::Per100G,
            &[("Energy", 450.0), ("Fat", 25.0)],
        );
        let items = vec![Allocation {
            contribution: make_contribution(
                FormulaRole::Standard,
                &powder,
                100.0,
                &settings(),
                None,
            ),
            source: &powder,
        }];
        let contributions: Vec<_> = items.iter().map(|i| i.contribution.clone()).collect();
        let totals = summarize(&contributions, &settings());

        let fat = target("Fat", 40.0, Some(55.0), DailyUnit::PercentEnergy);
        let balance = evaluate_nutrient(&fat, &items, &totals);
        // 25 g * 9 / 450 kcal = 50 %
        assert!((balance.delivered - 50.0).abs() < 1e-9);
        assert_eq!(balance.status, BalanceStatus::Normal);
    }

    #[test]
    fn test_linoleic_energy_share_row() {
        let powder = FormulaReference::new(
            "P",
            Basis::Per100G,
            &[("Energy", 500.0), ("Linoleic acid", 4.0)],
        );
        let items = vec![Allocation {
            contribution: make_contribution(
                FormulaRole::Standard,
                &powder,
                60.0,
                &settings(),
                None,
            ),
            source: &powder,
        }];
        let contributions: Vec<_> = items.iter().map(|i| i.contribution.clone()).collect();
        let totals = summarize(&contributions, &settings());

        let linoleic = target("Linoleic acid", 4.5, Some(10.0), DailyUnit::PercentEnergy);
        let balance = evaluate_nutrient(&linoleic, &items, &totals);
        // 2.4 g * 9 / 300 kcal = 7.2 %
        assert!((balance.delivered - 7.2).abs() < 1e-9);
        assert_eq!(balance.status, BalanceStatus::Normal);
    }

    #[test]
    fn test_composite_delivered_across_items() {
        let a = FormulaReference::new("A", Basis::Per100G, &[("Phe", 400.0), ("Tyr", 300.0)]);
        let b = FormulaReference::new("B", Basis::Per100G, &[("Phe", 0.0)]);
        let items = vec![
            Allocation {
                contribution: make_contribution(FormulaRole::Standard, &a, 50.0, &settings(), None),
                source: &a,
            },
            Allocation {
                contribution: make_contribution(FormulaRole::Special, &b, 50.0, &settings(), None),
                source: &b,
            },
        ];
        let totals = PlanTotals::default();
        let phe_tyr = target("Phe+Tyr", 100.0, Some(300.0), DailyUnit::MgPerDay);
        let balance = evaluate_nutrient(&phe_tyr, &items, &totals);

        // B lacks Tyr so it contributes nothing to the composite
        assert!((balance.delivered - 350.0).abs() < 1e-9);
        assert_eq!(balance.status, BalanceStatus::High);
        assert!((balance.excess_to_target - 150.0).abs() < 1e-9);
    }
}
