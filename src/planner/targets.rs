use std::collections::BTreeMap;

use crate::models::nutrient::{AgeGuideline, NutrientRange, TargetMode};
use crate::models::plan::ResolvedTarget;
use crate::models::unit::DailyUnit;
use crate::planner::composite::{resolve_composite_value, resolve_unit_for_composite};
use crate::planner::units::{to_daily_unit, to_daily_value};

/// Pick the point inside a range to aim for.
///
/// Floor-only ranges always aim at the floor since there is no ceiling to stay under.
pub fn pick_target(range: &NutrientRange, mode: TargetMode) -> f64 {
    if range.min_only {
        return range.min;
    }
    let max = range.max.unwrap_or(range.min);
    match mode {
        TargetMode::Min => range.min,
        TargetMode::Max => max,
        TargetMode::Mid => range.mid.unwrap_or((range.min + max) / 2.0),
    }
}

/// Resolve one guideline range into absolute daily terms.
pub fn resolve_target(range: &NutrientRange, weight_kg: f64, mode: TargetMode) -> ResolvedTarget {
    ResolvedTarget {
        nutrient: range.nutrient.clone(),
        total_min: to_daily_value(range.min, range.unit, weight_kg),
        total_max: range.max.map(|max| to_daily_value(max, range.unit, weight_kg)),
        total_target: to_daily_value(pick_target(range, mode), range.unit, weight_kg),
        total_unit: to_daily_unit(range.unit),
        min_only: range.min_only,
    }
}

/// Resolved targets for one calculation, in guideline order, with by-key lookups.
#[derive(Debug, Clone, Default)]
pub struct TargetTable {
    rows: Vec<ResolvedTarget>,
    targets: BTreeMap<String, f64>,
    units: BTreeMap<String, DailyUnit>,
}

impl TargetTable {
    pub fn rows(&self) -> &[ResolvedTarget] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ResolvedTarget> {
        self.rows
    }

    pub fn get(&self, nutrient: &str) -> Option<&ResolvedTarget> {
        self.rows.iter().find(|r| r.nutrient == nutrient)
    }

    /// Daily target for a simple or composite key.
    pub fn target(&self, key: &str) -> Option<f64> {
        resolve_composite_value(key, &self.targets)
    }

    /// Daily unit for a simple or composite key.
    pub fn unit(&self, key: &str, default: DailyUnit) -> DailyUnit {
        resolve_unit_for_composite(key, &self.units, default)
    }
}

/// Walk every range of an age group and resolve it for `weight_kg`.
pub fn resolve_targets(guideline: &AgeGuideline, weight_kg: f64, mode: TargetMode) -> TargetTable {
    let mut table = TargetTable::default();

    for range in &guideline.nutrients {
        let resolved = resolve_target(range, weight_kg, mode);
        table
            .targets
            .insert(resolved.nutrient.clone(), resolved.total_target);
        table
            .units
            .insert(resolved.nutrient.clone(), resolved.total_unit);
        table.rows.push(resolved);
    }

    table
}
