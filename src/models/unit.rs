use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit a guideline range is expressed in.
///
/// Weight-relative units (`*/kg/day`) are scaled by body weight when a target
/// is resolved; the rest are already absolute daily amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mg/kg/day")]
    MgPerKgDay,
    #[serde(rename = "g/kg/day")]
    GPerKgDay,
    #[serde(rename = "kcal/kg/day")]
    KcalPerKgDay,
    #[serde(rename = "mL/kg/day")]
    MlPerKgDay,
    #[serde(rename = "mg/day")]
    MgPerDay,
    #[serde(rename = "g/day")]
    GPerDay,
    #[serde(rename = "kcal/day")]
    KcalPerDay,
    #[serde(rename = "mL/day")]
    MlPerDay,
    #[serde(rename = "%energy")]
    PercentEnergy,
}

impl Unit {
    /// Whether values in this unit must be multiplied by body weight.
    pub fn is_per_kg(self) -> bool {
        matches!(
            self,
            Unit::MgPerKgDay | Unit::GPerKgDay | Unit::KcalPerKgDay | Unit::MlPerKgDay
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::MgPerKgDay => "mg/kg/day",
            Unit::GPerKgDay => "g/kg/day",
            Unit::KcalPerKgDay => "kcal/kg/day",
            Unit::MlPerKgDay => "mL/kg/day",
            Unit::MgPerDay => "mg/day",
            Unit::GPerDay => "g/day",
            Unit::KcalPerDay => "kcal/day",
            Unit::MlPerDay => "mL/day",
            Unit::PercentEnergy => "%energy",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical daily unit family a resolved target is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DailyUnit {
    #[serde(rename = "mg/day")]
    MgPerDay,
    #[serde(rename = "g/day")]
    GPerDay,
    #[serde(rename = "kcal/day")]
    KcalPerDay,
    #[serde(rename = "mL/day")]
    MlPerDay,
    #[serde(rename = "%energy")]
    PercentEnergy,
}

impl DailyUnit {
    /// Lenient parse of a free-form unit label.
    ///
    /// Anything outside the known unit set falls through to `%energy`.
    /// Library files never go through here since [`Unit`] is parsed strictly.
    /// This is public API for callers that hold unit labels from elsewhere,
    /// such as spreadsheets of lab values.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "mg/kg/day" | "mg/day" => DailyUnit::MgPerDay,
            "g/kg/day" | "g/day" => DailyUnit::GPerDay,
            "kcal/kg/day" | "kcal/day" => DailyUnit::KcalPerDay,
            "mL/kg/day" | "mL/day" => DailyUnit::MlPerDay,
            _ => DailyUnit::PercentEnergy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DailyUnit::MgPerDay => "mg/day",
            DailyUnit::GPerDay => "g/day",
            DailyUnit::KcalPerDay => "kcal/day",
            DailyUnit::MlPerDay => "mL/day",
            DailyUnit::PercentEnergy => "%energy",
        }
    }

    /// Short unit without the `/day` suffix, for per-item columns.
    pub fn short(self) -> &'static str {
        match self {
            DailyUnit::MgPerDay => "mg",
            DailyUnit::GPerDay => "g",
            DailyUnit::KcalPerDay => "kcal",
            DailyUnit::MlPerDay => "mL",
            DailyUnit::PercentEnergy => "%",
        }
    }
}

impl fmt::Display for DailyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
