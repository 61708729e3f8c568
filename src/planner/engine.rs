use tracing::debug;

use crate::models::nutrient::{ENERGY, FLUID, PROTEIN};
use crate::models::plan::{
    Advisory, CalculationInputs, CalculationOutputs, Highlights, LimiterHighlight,
};
use crate::models::unit::DailyUnit;
use crate::planner::allocation::{FormulaSet, allocate};
use crate::planner::balance::evaluate_balance;
use crate::planner::contribution::PrepSettings;
use crate::planner::targets::{TargetTable, resolve_targets};
use crate::planner::totals::build_plan;

/// Headline targets, including the primary limiter when the disease defines one.
pub fn highlights(targets: &TargetTable, primary_limiter: Option<&str>) -> Highlights {
    Highlights {
        energy_kcal: targets.target(ENERGY),
        protein_g: targets.target(PROTEIN),
        fluid_ml: targets.target(FLUID),
        primary_limiter: primary_limiter.map(|key| LimiterHighlight {
            nutrient: key.to_string(),
            value: targets.target(key),
            unit: targets.unit(key, DailyUnit::MgPerDay),
        }),
    }
}

/// Compute a full feeding plan.
///
/// Never fails: out-of-range numbers are clamped and conditions the plan
/// cannot satisfy are reported as advisories in the output.
pub fn calculate_diet(inputs: &CalculationInputs) -> CalculationOutputs {
    let settings = PrepSettings::from_inputs(inputs);
    let disease = &inputs.disease;
    let primary_limiter = disease.primary_limiter.as_deref();
    let mut notes = Vec::new();

    let guideline = disease.age_group(inputs.age_group_index);
    let targets = match guideline {
        Some(group) => resolve_targets(group, settings.weight_kg, inputs.target_mode),
        None => {
            notes.push(Advisory::MissingGuideline {
                disease: disease.name.clone(),
            });
            TargetTable::default()
        }
    };

    debug!(
        disease = %disease.id,
        weight_kg = settings.weight_kg,
        targets = targets.rows().len(),
        "resolved targets"
    );

    let allocation = allocate(
        FormulaSet {
            standard: &inputs.standard,
            special: inputs.special.as_ref(),
            modular: inputs.modular.as_ref(),
        },
        &targets,
        &settings,
        primary_limiter,
    );
    notes.extend(allocation.notes);

    let contributions = allocation
        .items
        .iter()
        .map(|a| a.contribution.clone())
        .collect();
    let plan = build_plan(contributions, &settings, &targets);
    let balance = evaluate_balance(&targets, &allocation.items, &plan.totals);

    CalculationOutputs {
        disease: disease.name.clone(),
        age_label: guideline.map(|g| g.age_label.clone()),
        target_mode: inputs.target_mode,
        highlights: highlights(&targets, primary_limiter),
        targets: targets.into_rows(),
        plan,
        balance,
        notes,
    }
}
