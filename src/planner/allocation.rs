//! Three-stage greedy sizing of the standard, special and modular formulas.
//!
//! 1. The standard formula is pushed up to the point where the first tracked
//!    amino acid reaches its ceiling (or sized by protein when none applies).
//! 2. The special formula closes the largest remaining deficit among
//!    protein, energy, carbohydrate and fat.
//! 3. The modular formula does the same on top of standard + special.
//!
//! Stages run once, in order, with no backtracking. When one formula's profile
//! makes two completion targets pull in different directions, the larger
//! required amount wins.

use tracing::debug;

use crate::models::formula::{FormulaReference, FormulaRole};
use crate::models::nutrient::{ENERGY, PROTEIN, key_parts};
use crate::models::plan::{Advisory, FormulaContribution};
use crate::models::unit::DailyUnit;
use crate::planner::constants::{
    BASIS_QUANTITY, EPSILON, MODULAR_COMPLETION_ORDER, NON_AMINO_ACID_NUTRIENTS,
    SPECIAL_COMPLETION_ORDER,
};
use crate::planner::contribution::{PrepSettings, delivered, make_contribution, per_basis};
use crate::planner::targets::TargetTable;

/// The formulas chosen for each role.
#[derive(Debug, Clone, Copy)]
pub struct FormulaSet<'a> {
    pub standard: &'a FormulaReference,
    pub special: Option<&'a FormulaReference>,
    pub modular: Option<&'a FormulaReference>,
}

/// A sized contribution together with the formula it was computed from.
#[derive(Debug, Clone)]
pub struct Allocation<'a> {
    pub contribution: FormulaContribution,
    pub source: &'a FormulaReference,
}

#[derive(Debug, Clone)]
pub struct AllocationResult<'a> {
    /// Allocations in stage order.
    pub items: Vec<Allocation<'a>>,
    pub notes: Vec<Advisory>,
}

/// A nutrient still below target after earlier stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Deficit {
    pub nutrient: &'static str,
    pub amount: f64,
    pub unit: DailyUnit,
}

/// Required amount of one formula to close the open deficits.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub amount: f64,
    pub notes: Vec<Advisory>,
}

/// Whether a key can act as an amino-acid ceiling.
///
/// A composite qualifies only if none of its parts is a macronutrient, energy,
/// fluid or an essential fatty acid.
pub fn is_amino_acid_like(key: &str) -> bool {
    key_parts(key).all(|part| !NON_AMINO_ACID_NUTRIENTS.contains(&part))
}

/// Clamp negative or non-finite amounts to zero.
#[inline]
fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 { amount } else { 0.0 }
}

/// Total of a nutrient delivered by everything allocated so far.
pub fn delivered_so_far(key: &str, items: &[Allocation<'_>]) -> f64 {
    match key {
        ENERGY => items.iter().map(|i| i.contribution.kcal).sum(),
        PROTEIN => items.iter().map(|i| i.contribution.protein).sum(),
        _ => items
            .iter()
            .filter_map(|i| {
                per_basis(i.source, key).map(|per_100| delivered(per_100, i.contribution.amount))
            })
            .sum(),
    }
}

/// Standard-formula amount at which the first amino-acid ceiling is reached.
///
/// Returns the binding nutrient and the amount, or `None` when no non-floor
/// amino acid with a ceiling is present in the formula.
pub fn limiting_amount<'t>(
    formula: &FormulaReference,
    targets: &'t TargetTable,
) -> Option<(&'t str, f64)> {
    let mut best: Option<(&'t str, f64)> = None;

    for target in targets.rows() {
        if target.min_only || !is_amino_acid_like(&target.nutrient) {
            continue;
        }
        let Some(ceiling) = target.total_max else {
            continue;
        };
        let Some(per_100) = per_basis(formula, &target.nutrient) else {
            continue;
        };
        if per_100 <= EPSILON {
            continue;
        }

        let candidate = ceiling * BASIS_QUANTITY / per_100;
        if candidate.is_finite() && best.is_none_or(|(_, amount)| candidate < amount) {
            best = Some((target.nutrient.as_str(), candidate));
        }
    }

    best
}

/// Stage 1: size the standard formula.
pub fn size_standard(
    formula: &FormulaReference,
    targets: &TargetTable,
    special_selected: bool,
    notes: &mut Vec<Advisory>,
) -> f64 {
    if let Some((nutrient, amount)) = limiting_amount(formula, targets) {
        let amount = sanitize_amount(amount);
        debug!(nutrient, amount, "standard formula limited by amino acid ceiling");
        notes.push(Advisory::LimitingNutrient {
            nutrient: nutrient.to_string(),
            amount,
            special_selected,
        });
        return amount;
    }

    let protein_target = targets.target(PROTEIN);
    let protein_per_100 = formula.value(PROTEIN).filter(|p| *p > EPSILON);

    match (protein_target, protein_per_100) {
        (Some(target), Some(per_100)) => {
            let amount = sanitize_amount(target * BASIS_QUANTITY / per_100);
            debug!(amount, "standard formula sized by protein target");
            notes.push(Advisory::ProteinFallback { amount });
            amount
        }
        _ => {
            debug!("standard formula could not be sized");
            notes.push(Advisory::StandardNotSized);
            0.0
        }
    }
}

/// Deficits of the completion nutrients that have a mass or energy target.
///
/// Rows expressed as a share of energy are skipped since a share does not
/// scale linearly with dose.
pub fn open_deficits(
    order: &[&'static str],
    targets: &TargetTable,
    items: &[Allocation<'_>],
) -> Vec<Deficit> {
    order
        .iter()
        .filter_map(|&nutrient| {
            let target = targets.get(nutrient)?;
            if target.total_unit == DailyUnit::PercentEnergy {
                return None;
            }
            let amount = (target.total_target - delivered_so_far(nutrient, items)).max(0.0);
            (amount > EPSILON).then_some(Deficit {
                nutrient,
                amount,
                unit: target.total_unit,
            })
        })
        .collect()
}

/// Amount of `formula` needed so that every open deficit it can supply is closed.
///
/// Contribution is linear in dose, so the largest per-nutrient requirement
/// closes all the others as well.
pub fn required_amount_for_completion(
    role: FormulaRole,
    formula: &FormulaReference,
    deficits: &[Deficit],
) -> Completion {
    let mut required = 0.0_f64;
    let mut notes = Vec::new();

    for deficit in deficits {
        match per_basis(formula, deficit.nutrient) {
            Some(per_100) if per_100 > EPSILON => {
                required = required.max(deficit.amount * BASIS_QUANTITY / per_100);
            }
            _ => notes.push(Advisory::Unclosable {
                role,
                nutrient: deficit.nutrient.to_string(),
                deficit: deficit.amount,
                unit: deficit.unit,
            }),
        }
    }

    Completion {
        amount: sanitize_amount(required),
        notes,
    }
}

/// Stages 2 and 3: size an optional completion role on top of `items`.
fn size_completion_role<'a>(
    role: FormulaRole,
    formula: Option<&'a FormulaReference>,
    order: &[&'static str],
    targets: &TargetTable,
    items: &[Allocation<'a>],
    settings: &PrepSettings,
    primary_limiter: Option<&str>,
    notes: &mut Vec<Advisory>,
) -> Option<Allocation<'a>> {
    let deficits = open_deficits(order, targets, items);

    let Some(formula) = formula else {
        if !deficits.is_empty() {
            notes.push(Advisory::NoFormulaSelected {
                role,
                nutrients: deficits.iter().map(|d| d.nutrient.to_string()).collect(),
            });
        }
        return None;
    };

    let completion = required_amount_for_completion(role, formula, &deficits);
    debug!(%role, amount = completion.amount, open = deficits.len(), "completion role sized");
    notes.extend(completion.notes);

    (completion.amount > EPSILON).then(|| Allocation {
        contribution: make_contribution(
            role,
            formula,
            completion.amount,
            settings,
            primary_limiter,
        ),
        source: formula,
    })
}

/// Run all three stages.
pub fn allocate<'a>(
    formulas: FormulaSet<'a>,
    targets: &TargetTable,
    settings: &PrepSettings,
    primary_limiter: Option<&str>,
) -> AllocationResult<'a> {
    let mut notes = Vec::new();
    let mut items = Vec::with_capacity(3);

    let standard_amount = size_standard(
        formulas.standard,
        targets,
        formulas.special.is_some(),
        &mut notes,
    );
    items.push(Allocation {
        contribution: make_contribution(
            FormulaRole::Standard,
            formulas.standard,
            standard_amount,
            settings,
            primary_limiter,
        ),
        source: formulas.standard,
    });

    let stages = [
        (FormulaRole::Special, formulas.special, &SPECIAL_COMPLETION_ORDER),
        (FormulaRole::Modular, formulas.modular, &MODULAR_COMPLETION_ORDER),
    ];
    for (role, formula, order) in stages {
        if let Some(allocation) = size_completion_role(
            role,
            formula,
            order,
            targets,
            &items,
            settings,
            primary_limiter,
            &mut notes,
        ) {
            items.push(allocation);
        }
    }

    AllocationResult { items, notes }
}
