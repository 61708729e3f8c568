pub mod allocation;
pub mod balance;
pub mod composite;
pub mod constants;
pub mod contribution;
pub mod engine;
pub mod targets;
pub mod totals;
pub mod units;

pub use allocation::{FormulaSet, allocate, is_amino_acid_like, required_amount_for_completion};
pub use balance::{classify, evaluate_balance};
pub use composite::{NutrientLookup, resolve_composite_value, resolve_unit_for_composite};
pub use constants::*;
pub use contribution::{PrepSettings, make_contribution};
pub use engine::calculate_diet;
pub use targets::{TargetTable, pick_target, resolve_targets};
pub use totals::{build_plan, summarize};
pub use units::{to_daily_unit, to_daily_value};
