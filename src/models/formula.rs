use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DietError, Result};
use crate::models::unit::DailyUnit;

/// Whether nutrient density is given per 100 g of powder or per 100 mL of liquid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    #[serde(rename = "100g")]
    Per100G,
    #[serde(rename = "100mL")]
    Per100Ml,
}

impl Basis {
    /// Daily unit a formula amount on this basis is measured in.
    pub fn amount_unit(self) -> DailyUnit {
        match self {
            Basis::Per100G => DailyUnit::GPerDay,
            Basis::Per100Ml => DailyUnit::MlPerDay,
        }
    }

    pub fn is_powder(self) -> bool {
        self == Basis::Per100G
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Per100G => f.write_str("100g"),
            Basis::Per100Ml => f.write_str("100mL"),
        }
    }
}

/// The three conventional roles in a metabolic feeding plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FormulaRole {
    /// Near-complete intact-protein formula.
    Standard,
    /// Restricted / protein-modified formula.
    Special,
    /// Protein-free energy and macronutrient filler.
    Modular,
}

impl fmt::Display for FormulaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormulaRole::Standard => "standard",
            FormulaRole::Special => "special",
            FormulaRole::Modular => "modular",
        };
        f.write_str(label)
    }
}

/// Nutrient density of one formula.
///
/// `values` is sparse: a missing key means "not tracked", which is different
/// from an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaReference {
    pub name: String,
    pub basis: Basis,
    pub values: BTreeMap<String, f64>,
}

impl FormulaReference {
    pub fn new(name: &str, basis: Basis, values: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            basis,
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Direct per-basis value of a simple key.
    #[inline]
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Check keys against a registry predicate and reject unusable values.
    pub fn validate(&self, recognizes: impl Fn(&str) -> bool) -> Result<()> {
        for (key, value) in &self.values {
            if !recognizes(key) {
                return Err(DietError::UnknownNutrient {
                    owner: format!("formula '{}'", self.name),
                    key: key.clone(),
                });
            }
            if !value.is_finite() || *value < 0.0 {
                return Err(DietError::InvalidFormula {
                    name: self.name.clone(),
                    reason: format!("{} must be a non-negative number, got {}", key, value),
                });
            }
        }
        Ok(())
    }
}

/// A user-authored formula where every nutrient field is optional.
///
/// Absent fields are dropped rather than coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFormula {
    pub id: String,
    pub name: String,
    pub basis: Basis,
    pub role: FormulaRole,
    #[serde(default)]
    pub diseases: Vec<String>,
    pub values: BTreeMap<String, Option<f64>>,
}

impl CustomFormula {
    pub fn to_reference(&self) -> FormulaReference {
        FormulaReference {
            name: self.name.clone(),
            basis: self.basis,
            values: self
                .values
                .iter()
                .filter_map(|(k, v)| v.map(|v| (k.clone(), v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_units() {
        assert_eq!(Basis::Per100G.amount_unit(), DailyUnit::GPerDay);
        assert_eq!(Basis::Per100Ml.amount_unit(), DailyUnit::MlPerDay);
        assert!(Basis::Per100G.is_powder());
        assert!(!Basis::Per100Ml.is_powder());
    }

    #[test]
    fn test_custom_formula_drops_absent_fields() {
        let json = r#"{
            "id": "home-mix",
            "name": "Home Mix",
            "basis": "100g",
            "role": "special",
            "values": {"Protein": 12.5, "Phenylalanine": 0, "Tyrosine": null}
        }"#;
        let custom: CustomFormula = serde_json::from_str(json).unwrap();
        let reference = custom.to_reference();

        assert_eq!(reference.value("Protein"), Some(12.5));
        // Zero is a meaningful value and must survive
        assert_eq!(reference.value("Phenylalanine"), Some(0.0));
        assert_eq!(reference.value("Tyrosine"), None);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let formula = FormulaReference::new("Bad", Basis::Per100G, &[("Protein", -1.0)]);
        assert!(matches!(
            formula.validate(|_| true),
            Err(DietError::InvalidFormula { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_key() {
        let formula = FormulaReference::new("Odd", Basis::Per100G, &[("Glitter", 1.0)]);
        assert!(matches!(
            formula.validate(|k| k == "Protein"),
            Err(DietError::UnknownNutrient { .. })
        ));
    }
}
