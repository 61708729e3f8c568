use crate::models::nutrient::{ENERGY, PROTEIN};
use crate::models::plan::{FormulaContribution, FormulaPlan, PlanTotals};
use crate::planner::contribution::PrepSettings;
use crate::planner::targets::TargetTable;

/// Aggregate plan items into preparation totals.
pub fn summarize(items: &[FormulaContribution], settings: &PrepSettings) -> PlanTotals {
    let mut totals = PlanTotals::default();
    let mut limiter_total: Option<f64> = None;

    for item in items {
        totals.kcal += item.kcal;
        totals.protein += item.protein;

        if let Some(value) = item.primary_limiter_delivered {
            *limiter_total.get_or_insert(0.0) += value;
        }

        if item.basis.is_powder() {
            totals.powder_g += item.amount;
        } else {
            totals.ready_to_feed_ml += item.amount;
        }
        totals.scoops += item.scoops.unwrap_or(0.0);
        totals.water_ml += item.water_ml.unwrap_or(0.0);
    }

    let feeds = settings.feeds_per_day as f64;
    totals.primary_limiter = limiter_total;
    totals.final_volume_ml = totals.water_ml + totals.ready_to_feed_ml;
    totals.per_feed_scoops = totals.scoops / feeds;
    totals.per_feed_volume_ml = totals.final_volume_ml / feeds;
    totals
}

/// Build the plan with totals and the protein/energy still missing.
pub fn build_plan(
    items: Vec<FormulaContribution>,
    settings: &PrepSettings,
    targets: &TargetTable,
) -> FormulaPlan {
    let totals = summarize(&items, settings);
    let remaining = |key: &str, delivered: f64| {
        targets
            .target(key)
            .map(|target| (target - delivered).max(0.0))
            .unwrap_or(0.0)
    };

    FormulaPlan {
        protein_deficit: remaining(PROTEIN, totals.protein),
        energy_deficit: remaining(ENERGY, totals.kcal),
        items,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::formula::{Basis, FormulaReference, FormulaRole};
    use crate::models::nutrient::{AgeGuideline, NutrientRange, TargetMode};
    use crate::models::unit::Unit;
    use crate::planner::contribution::make_contribution;
    use crate::planner::targets::resolve_targets;

    fn settings() -> PrepSettings {
        PrepSettings {
            weight_kg: 4.0,
            feeds_per_day: 8,
            scoop_size_g: 5.0,
            water_per_scoop_ml: 30.0,
        }
    }

    fn items() -> Vec<FormulaContribution> {
        let powder = FormulaReference::new(
            "Powder",
            Basis::Per100G,
            &[("Energy", 500.0), ("Protein", 10.0), ("X", 400.0)],
        );
        let liquid = FormulaReference::new(
            "Liquid",
            Basis::Per100Ml,
            &[("Energy", 70.0), ("Protein", 2.0)],
        );
        vec![
            make_contribution(FormulaRole::Standard, &powder, 40.0, &settings(), Some("X")),
            make_contribution(FormulaRole::Modular, &liquid, 200.0, &settings(), Some("X")),
        ]
    }

    #[test]
    fn test_summarize_mixed_bases() {
        let totals = summarize(&items(), &settings());

        assert_eq!(totals.powder_g, 40.0);
        assert_eq!(totals.ready_to_feed_ml, 200.0);
        assert_eq!(totals.scoops, 8.0);
        assert_eq!(totals.water_ml, 240.0);
        assert_eq!(totals.final_volume_ml, 440.0);
        assert_eq!(totals.per_feed_scoops, 1.0);
        assert_eq!(totals.per_feed_volume_ml, 55.0);
        assert!((totals.kcal - 340.0).abs() < 1e-9);
        assert!((totals.protein - 8.0).abs() < 1e-9);
        // Only the powder reports X
        assert_eq!(totals.primary_limiter, Some(160.0));
    }

    #[test]
    fn test_summarize_empty() {
        let totals = summarize(&[], &settings());
        assert_eq!(totals, PlanTotals::default());
    }

    #[test]
    fn test_build_plan_deficits() {
        let guideline = AgeGuideline {
            age_label: "infant".to_string(),
            nutrients: vec![
                NutrientRange::new("Protein", 2.5, 2.5, Unit::GPerKgDay),
                NutrientRange::new("Energy", 100.0, 100.0, Unit::KcalPerKgDay),
            ],
        };
        let targets = resolve_targets(&guideline, 4.0, TargetMode::Mid);
        let plan = build_plan(items(), &settings(), &targets);

        assert!((plan.protein_deficit - 2.0).abs() < 1e-9);
        assert!((plan.energy_deficit - 60.0).abs() < 1e-9);
        assert_eq!(plan.items.len(), 2);
    }

    #[test]
    fn test_build_plan_without_targets_has_no_deficit() {
        let plan = build_plan(items(), &settings(), &TargetTable::default());
        assert_eq!(plan.protein_deficit, 0.0);
        assert_eq!(plan.energy_deficit, 0.0);
    }
}
