use std::fmt;

use serde::Serialize;

use crate::models::formula::FormulaRole;
use crate::models::plan::{BalanceStatus, CalculationInputs, CalculationOutputs};
use crate::planner::contribution::{delivered, per_basis};
use crate::planner::{EPSILON, calculate_diet, is_amino_acid_like};
use crate::sweep::sampling::SampledCase;

/// Property checked on every sampled case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Check {
    /// Same inputs give the same outputs.
    Idempotence,
    /// Amounts, scoops and water are never negative.
    NonNegative,
    /// The standard formula alone stays within every amino-acid ceiling.
    CeilingRespected,
    /// Every reported number is finite.
    Finite,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Check::Idempotence => "idempotence",
            Check::NonNegative => "non-negative",
            Check::CeilingRespected => "ceiling",
            Check::Finite => "finite",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub check: Check,
    pub detail: String,
}

/// Outcome of running one sampled case through the engine.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub index: usize,
    pub case: SampledCase,
    pub standard_amount: f64,
    pub special_amount: f64,
    pub modular_amount: f64,
    pub total_kcal: f64,
    pub total_protein: f64,
    pub final_volume_ml: f64,
    pub low_count: usize,
    pub high_count: usize,
    pub note_count: usize,
    pub violations: Vec<Violation>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

fn check_non_negative(outputs: &CalculationOutputs, violations: &mut Vec<Violation>) {
    for item in &outputs.plan.items {
        let quantities = [
            ("amount", Some(item.amount)),
            ("scoops", item.scoops),
            ("water", item.water_ml),
        ];
        for (label, value) in quantities {
            if let Some(v) = value.filter(|v| *v < 0.0) {
                violations.push(Violation {
                    check: Check::NonNegative,
                    detail: format!("{} {} is {}", item.role, label, v),
                });
            }
        }
    }
}

fn check_finite(outputs: &CalculationOutputs, violations: &mut Vec<Violation>) {
    let mut numbers: Vec<(String, f64)> = Vec::new();

    for item in &outputs.plan.items {
        numbers.push((format!("{} amount", item.role), item.amount));
        numbers.push((format!("{} kcal", item.role), item.kcal));
        numbers.push((format!("{} protein", item.role), item.protein));
        numbers.push((format!("{} per feed", item.role), item.per_feed_amount));
    }

    let t = &outputs.plan.totals;
    numbers.extend([
        ("total kcal".to_string(), t.kcal),
        ("total protein".to_string(), t.protein),
        ("final volume".to_string(), t.final_volume_ml),
        ("per feed volume".to_string(), t.per_feed_volume_ml),
        ("per feed scoops".to_string(), t.per_feed_scoops),
    ]);

    for b in &outputs.balance {
        numbers.push((format!("{} delivered", b.nutrient), b.delivered));
    }

    for (label, value) in numbers {
        if !value.is_finite() {
            violations.push(Violation {
                check: Check::Finite,
                detail: format!("{} is {}", label, value),
            });
        }
    }
}

/// The standard formula on its own must not push any amino acid past its ceiling.
fn check_ceilings(
    inputs: &CalculationInputs,
    outputs: &CalculationOutputs,
    violations: &mut Vec<Violation>,
) {
    let amount = outputs.plan.amount(FormulaRole::Standard);

    for target in &outputs.targets {
        if target.min_only || !is_amino_acid_like(&target.nutrient) {
            continue;
        }
        let (Some(ceiling), Some(per_100)) =
            (target.total_max, per_basis(&inputs.standard, &target.nutrient))
        else {
            continue;
        };

        let from_standard = delivered(per_100, amount);
        if from_standard > ceiling + EPSILON * ceiling.max(1.0) {
            violations.push(Violation {
                check: Check::CeilingRespected,
                detail: format!(
                    "standard delivers {:.3} {} of {} above ceiling {:.3}",
                    from_standard, target.total_unit, target.nutrient, ceiling
                ),
            });
        }
    }
}

/// Run a case twice and check every property.
pub fn evaluate_case(index: usize, case: SampledCase, inputs: &CalculationInputs) -> CaseResult {
    let outputs = calculate_diet(inputs);
    let again = calculate_diet(inputs);
    let mut violations = Vec::new();

    if outputs != again {
        violations.push(Violation {
            check: Check::Idempotence,
            detail: "repeated calculation differs".to_string(),
        });
    }
    check_non_negative(&outputs, &mut violations);
    check_ceilings(inputs, &outputs, &mut violations);
    check_finite(&outputs, &mut violations);

    let count = |status: BalanceStatus| {
        outputs
            .balance
            .iter()
            .filter(|b| b.status == status)
            .count()
    };

    CaseResult {
        index,
        case,
        standard_amount: outputs.plan.amount(FormulaRole::Standard),
        special_amount: outputs.plan.amount(FormulaRole::Special),
        modular_amount: outputs.plan.amount(FormulaRole::Modular),
        total_kcal: outputs.plan.totals.kcal,
        total_protein: outputs.plan.totals.protein,
        final_volume_ml: outputs.plan.totals.final_volume_ml,
        low_count: count(BalanceStatus::Low),
        high_count: count(BalanceStatus::High),
        note_count: outputs.notes.len(),
        violations,
    }
}
