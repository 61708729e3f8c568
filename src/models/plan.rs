use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::formula::{Basis, FormulaReference, FormulaRole};
use crate::models::nutrient::{Disease, TargetMode};
use crate::models::unit::DailyUnit;

/// Everything one calculation needs, with formulas already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInputs {
    pub weight_kg: f64,
    pub feeds_per_day: u32,
    pub scoop_size_g: f64,
    pub water_per_scoop_ml: f64,
    #[serde(default)]
    pub target_mode: TargetMode,
    #[serde(default)]
    pub age_group_index: usize,
    pub disease: Disease,
    pub standard: FormulaReference,
    #[serde(default)]
    pub special: Option<FormulaReference>,
    #[serde(default)]
    pub modular: Option<FormulaReference>,
}

/// Daily target for one nutrient, derived from its guideline range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTarget {
    pub nutrient: String,
    pub total_min: f64,
    pub total_max: Option<f64>,
    pub total_target: f64,
    pub total_unit: DailyUnit,
    pub min_only: bool,
}

/// What one formula role delivers at its sized amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaContribution {
    pub role: FormulaRole,
    pub formula_name: String,
    pub basis: Basis,
    pub amount: f64,
    pub amount_unit: DailyUnit,
    pub kcal: f64,
    pub protein: f64,
    pub primary_limiter_delivered: Option<f64>,
    pub scoops: Option<f64>,
    pub water_ml: Option<f64>,
    pub per_feed_amount: f64,
    pub per_feed_scoops: Option<f64>,
    pub per_feed_water_ml: Option<f64>,
}

/// Aggregate preparation quantities across all plan items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTotals {
    pub kcal: f64,
    pub protein: f64,
    pub primary_limiter: Option<f64>,
    pub powder_g: f64,
    pub scoops: f64,
    pub water_ml: f64,
    pub ready_to_feed_ml: f64,
    pub final_volume_ml: f64,
    pub per_feed_scoops: f64,
    pub per_feed_volume_ml: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaPlan {
    /// Contributions in allocation order: standard, special, modular.
    pub items: Vec<FormulaContribution>,
    pub totals: PlanTotals,
    pub protein_deficit: f64,
    pub energy_deficit: f64,
}

impl FormulaPlan {
    pub fn item(&self, role: FormulaRole) -> Option<&FormulaContribution> {
        self.items.iter().find(|i| i.role == role)
    }

    /// Sized amount for a role, 0 when the role is absent.
    pub fn amount(&self, role: FormulaRole) -> f64 {
        self.item(role).map(|i| i.amount).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BalanceStatus {
    Low,
    Normal,
    High,
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BalanceStatus::Low => "LOW",
            BalanceStatus::Normal => "NORMAL",
            BalanceStatus::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// Delivered amount of one nutrient scored against its resolved range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientBalance {
    pub nutrient: String,
    pub unit: DailyUnit,
    pub min: f64,
    pub max: Option<f64>,
    pub target: f64,
    pub delivered: f64,
    pub deficit_to_target: f64,
    pub excess_to_target: f64,
    pub status: BalanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimiterHighlight {
    pub nutrient: String,
    pub value: Option<f64>,
    pub unit: DailyUnit,
}

/// Headline daily targets shown above the detail tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub energy_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub fluid_ml: Option<f64>,
    pub primary_limiter: Option<LimiterHighlight>,
}

/// Caregiver-facing advisory raised while sizing the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Advisory {
    /// The selected age bracket has no guideline to resolve targets from.
    MissingGuideline { disease: String },
    /// Standard formula sized to the ceiling of the first nutrient that binds.
    LimitingNutrient {
        nutrient: String,
        amount: f64,
        special_selected: bool,
    },
    /// No amino-acid ceiling applied; standard formula sized by protein target.
    ProteinFallback { amount: f64 },
    /// No ceiling applied and the standard formula carries no protein.
    StandardNotSized,
    /// The formula assigned to a role has none of a nutrient still in deficit.
    Unclosable {
        role: FormulaRole,
        nutrient: String,
        deficit: f64,
        unit: DailyUnit,
    },
    /// A deficit exists but no formula was selected for the role meant to close it.
    NoFormulaSelected {
        role: FormulaRole,
        nutrients: Vec<String>,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MissingGuideline { disease } => {
                write!(f, "No guideline ranges are available for {}.", disease)
            }
            Advisory::LimitingNutrient {
                nutrient,
                amount,
                special_selected,
            } => {
                write!(
                    f,
                    "Standard formula limited to {:.1} by the upper bound of {}.",
                    amount, nutrient
                )?;
                if *special_selected {
                    write!(f, " The special formula covers the remaining requirement.")
                } else {
                    write!(f, " No special formula is selected.")
                }
            }
            Advisory::ProteinFallback { amount } => write!(
                f,
                "No amino acid ceiling applies to the standard formula; sized to {:.1} by the protein target.",
                amount
            ),
            Advisory::StandardNotSized => write!(
                f,
                "Standard formula has no limiting amino acid and no protein; it cannot close the protein deficit."
            ),
            Advisory::Unclosable {
                role,
                nutrient,
                deficit,
                unit,
            } => write!(
                f,
                "The {} formula contains no {}; a deficit of {:.1} {} will remain.",
                role,
                nutrient,
                deficit,
                unit.short()
            ),
            Advisory::NoFormulaSelected { role, nutrients } => write!(
                f,
                "No {} formula selected while {} remain below target.",
                role,
                nutrients.join(", ")
            ),
        }
    }
}

/// Full result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOutputs {
    pub disease: String,
    pub age_label: Option<String>,
    pub target_mode: TargetMode,
    pub targets: Vec<ResolvedTarget>,
    pub highlights: Highlights,
    pub plan: FormulaPlan,
    pub balance: Vec<NutrientBalance>,
    pub notes: Vec<Advisory>,
}

impl CalculationOutputs {
    pub fn balance_for(&self, nutrient: &str) -> Option<&NutrientBalance> {
        self.balance.iter().find(|b| b.nutrient == nutrient)
    }

    pub fn target_for(&self, nutrient: &str) -> Option<&ResolvedTarget> {
        self.targets.iter().find(|t| t.nutrient == nutrient)
    }
}
