pub mod formula;
pub mod nutrient;
pub mod plan;
pub mod unit;

pub use formula::{Basis, CustomFormula, FormulaReference, FormulaRole};
pub use nutrient::{AgeGuideline, Disease, NutrientRange, TargetMode};
pub use plan::{
    Advisory, BalanceStatus, CalculationInputs, CalculationOutputs, FormulaContribution,
    FormulaPlan, Highlights, LimiterHighlight, NutrientBalance, PlanTotals, ResolvedTarget,
};
pub use unit::{DailyUnit, Unit};
