use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DietError, Result};
use crate::models::unit::Unit;

pub const ENERGY: &str = "Energy";
pub const PROTEIN: &str = "Protein";
pub const FLUID: &str = "Fluid";
pub const FAT: &str = "Fat";
pub const CARBOHYDRATE: &str = "Carbohydrate";
pub const LINOLEIC_ACID: &str = "Linoleic acid";
pub const ALPHA_LINOLENIC_ACID: &str = "Alpha-linolenic acid";

/// Nutrients recognized for every disease, in addition to its tracked amino acids.
pub const CORE_NUTRIENTS: [&str; 7] = [
    ENERGY,
    PROTEIN,
    FLUID,
    FAT,
    CARBOHYDRATE,
    LINOLEIC_ACID,
    ALPHA_LINOLENIC_ACID,
];

/// Separator for composite keys such as `"Phenylalanine+Tyrosine"`.
pub const COMPOSITE_SEPARATOR: char = '+';

/// Split a nutrient key into its trimmed parts. A simple key yields itself.
pub fn key_parts(key: &str) -> impl Iterator<Item = &str> {
    key.split(COMPOSITE_SEPARATOR).map(str::trim)
}

pub fn is_core_nutrient(key: &str) -> bool {
    CORE_NUTRIENTS.contains(&key)
}

/// Where to aim inside a guideline's min..max band.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    Min,
    #[default]
    Mid,
    Max,
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetMode::Min => "minimum",
            TargetMode::Mid => "midpoint",
            TargetMode::Max => "maximum",
        };
        f.write_str(label)
    }
}

/// Clinical guideline band for one nutrient at one age bracket.
///
/// `max` may be omitted only for `min_only` ranges, which carry a floor but no
/// tracked safety ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRange {
    pub nutrient: String,
    pub min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<f64>,
    #[serde(default)]
    pub min_only: bool,
}

impl NutrientRange {
    pub fn new(nutrient: &str, min: f64, max: f64, unit: Unit) -> Self {
        Self {
            nutrient: nutrient.to_string(),
            min,
            max: Some(max),
            unit,
            mid: None,
            min_only: false,
        }
    }

    /// A floor-only range. `max` is kept for display when the guideline lists one.
    pub fn floor(nutrient: &str, min: f64, max: Option<f64>, unit: Unit) -> Self {
        Self {
            nutrient: nutrient.to_string(),
            min,
            max,
            unit,
            mid: None,
            min_only: true,
        }
    }

    /// Check the band is usable. Returns the reason when it is not.
    fn check(&self) -> std::result::Result<(), String> {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !finite_non_negative(self.min) {
            return Err(format!("min must be a non-negative number, got {}", self.min));
        }
        if let Some(mid) = self.mid {
            if !finite_non_negative(mid) {
                return Err(format!("mid must be a non-negative number, got {}", mid));
            }
        }
        match self.max {
            Some(max) if !finite_non_negative(max) => {
                Err(format!("max must be a non-negative number, got {}", max))
            }
            Some(max) if !self.min_only && self.min > max => {
                Err(format!("min {} exceeds max {}", self.min, max))
            }
            None if !self.min_only => Err("max is required unless minOnly is set".to_string()),
            _ => Ok(()),
        }
    }
}

/// Guideline ranges for one age bracket of one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGuideline {
    pub age_label: String,
    pub nutrients: Vec<NutrientRange>,
}

impl AgeGuideline {
    pub fn range(&self, nutrient: &str) -> Option<&NutrientRange> {
        self.nutrients.iter().find(|r| r.nutrient == nutrient)
    }
}

/// A disease with its nutrient registry and age-bracketed guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: String,
    pub name: String,
    /// The most tightly restricted nutrient; may be a composite key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_limiter: Option<String>,
    /// Disease-specific nutrient keys (usually amino acids) on top of the core set.
    #[serde(default)]
    pub tracked_nutrients: Vec<String>,
    pub age_groups: Vec<AgeGuideline>,
}

impl Disease {
    /// Whether every part of `key` is a core nutrient or tracked by this disease.
    pub fn recognizes(&self, key: &str) -> bool {
        key_parts(key).all(|part| {
            is_core_nutrient(part) || self.tracked_nutrients.iter().any(|t| t == part)
        })
    }

    /// Clamp an age group index into the valid range.
    pub fn clamp_age_index(&self, index: usize) -> usize {
        index.min(self.age_groups.len().saturating_sub(1))
    }

    /// The age group at `index`, clamped to the available brackets.
    pub fn age_group(&self, index: usize) -> Option<&AgeGuideline> {
        self.age_groups.get(self.clamp_age_index(index))
    }

    /// Validate nutrient keys against the registry and check every range.
    pub fn validate(&self) -> Result<()> {
        if self.age_groups.is_empty() {
            return Err(DietError::EmptyGuideline(self.id.clone()));
        }

        if let Some(limiter) = &self.primary_limiter {
            if !self.recognizes(limiter) {
                return Err(DietError::UnknownNutrient {
                    owner: format!("disease '{}' primary limiter", self.id),
                    key: limiter.clone(),
                });
            }
        }

        for group in &self.age_groups {
            for range in &group.nutrients {
                if !self.recognizes(&range.nutrient) {
                    return Err(DietError::UnknownNutrient {
                        owner: format!("disease '{}' ({})", self.id, group.age_label),
                        key: range.nutrient.clone(),
                    });
                }
                range.check().map_err(|reason| DietError::InvalidRange {
                    disease: self.id.clone(),
                    age: group.age_label.clone(),
                    nutrient: range.nutrient.clone(),
                    reason,
                })?;
            }
        }

        Ok(())
    }
}
