use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::warn;

use crate::error::{DietError, Result};
use crate::models::formula::{CustomFormula, FormulaReference, FormulaRole};
use crate::models::nutrient::{Disease, TargetMode, is_core_nutrient, key_parts};
use crate::models::plan::CalculationInputs;

/// Minimum Jaro-Winkler similarity for a fuzzy formula match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// One formula in the library with its role and applicability tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub role: FormulaRole,
    /// Disease ids this formula is meant for. Empty means any disease.
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(flatten)]
    pub formula: FormulaReference,
}

impl CatalogEntry {
    pub fn applies_to(&self, disease_id: &str) -> bool {
        self.diseases.is_empty()
            || self
                .diseases
                .iter()
                .any(|d| d.eq_ignore_ascii_case(disease_id))
    }

    /// Best similarity of `query` against this entry's id and name.
    fn similarity(&self, query: &str) -> f64 {
        let query = query.to_lowercase();
        jaro_winkler(&self.id.to_lowercase(), &query)
            .max(jaro_winkler(&self.formula.name.to_lowercase(), &query))
    }
}

impl From<&CustomFormula> for CatalogEntry {
    fn from(custom: &CustomFormula) -> Self {
        Self {
            id: custom.id.clone(),
            role: custom.role,
            diseases: custom.diseases.clone(),
            formula: custom.to_reference(),
        }
    }
}

/// Settings for one calculation, referring to library entries by id or name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub disease: String,
    #[serde(default)]
    pub age_group_index: usize,
    pub weight_kg: f64,
    pub feeds_per_day: u32,
    pub scoop_size_g: f64,
    pub water_per_scoop_ml: f64,
    #[serde(default)]
    pub target_mode: TargetMode,
    pub standard: String,
    #[serde(default)]
    pub special: Option<String>,
    #[serde(default)]
    pub modular: Option<String>,
}

/// Immutable catalog of disease guidelines and formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub diseases: Vec<Disease>,
    pub formulas: Vec<CatalogEntry>,
}

impl Library {
    /// Whether a key (or every part of a composite) is known to some disease.
    pub fn recognizes(&self, key: &str) -> bool {
        key_parts(key).all(|part| {
            is_core_nutrient(part)
                || self
                    .diseases
                    .iter()
                    .any(|d| d.tracked_nutrients.iter().any(|t| t == part))
        })
    }

    /// Check every disease and formula against the nutrient registry.
    pub fn validate(&self) -> Result<()> {
        let mut disease_ids = HashSet::new();
        for disease in &self.diseases {
            if !disease_ids.insert(disease.id.to_lowercase()) {
                return Err(DietError::InvalidInput(format!(
                    "duplicate disease id '{}'",
                    disease.id
                )));
            }
            disease.validate()?;
        }

        let mut formula_ids = HashSet::new();
        for entry in &self.formulas {
            if !formula_ids.insert(entry.id.to_lowercase()) {
                return Err(DietError::InvalidInput(format!(
                    "duplicate formula id '{}'",
                    entry.id
                )));
            }
            if let Some(tag) = entry
                .diseases
                .iter()
                .find(|tag| !disease_ids.contains(&tag.to_lowercase()))
            {
                return Err(DietError::UnknownDisease(format!(
                    "{} (tagged on formula '{}')",
                    tag, entry.id
                )));
            }
            entry.formula.validate(|key| self.recognizes(key))?;
        }

        Ok(())
    }

    /// Merge user-authored formulas; an entry with an existing id replaces it.
    pub fn add_custom(&mut self, customs: &[CustomFormula]) -> Result<()> {
        for custom in customs {
            let entry = CatalogEntry::from(custom);
            match self
                .formulas
                .iter_mut()
                .find(|e| e.id.eq_ignore_ascii_case(&entry.id))
            {
                Some(existing) => *existing = entry,
                None => self.formulas.push(entry),
            }
        }
        self.validate()
    }

    pub fn disease(&self, id: &str) -> Result<&Disease> {
        self.diseases
            .iter()
            .find(|d| d.id.eq_ignore_ascii_case(id) || d.name.eq_ignore_ascii_case(id))
            .ok_or_else(|| DietError::UnknownDisease(id.to_string()))
    }

    pub fn formula(&self, id: &str) -> Option<&CatalogEntry> {
        self.formulas.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }

    /// Entries for a role, optionally restricted to those applicable to a disease.
    pub fn formulas_for(
        &self,
        role: Option<FormulaRole>,
        disease_id: Option<&str>,
    ) -> Vec<&CatalogEntry> {
        self.formulas
            .iter()
            .filter(|e| role.is_none_or(|r| e.role == r))
            .filter(|e| disease_id.is_none_or(|d| e.applies_to(d)))
            .collect()
    }

    /// Fuzzy candidates for a free-text query, best first.
    pub fn find_formula(&self, query: &str) -> Vec<(&CatalogEntry, f64)> {
        let mut candidates: Vec<(&CatalogEntry, f64)> = self
            .formulas
            .iter()
            .map(|e| (e, e.similarity(query)))
            .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates
    }

    /// Resolve an id, exact name, or the single best fuzzy match.
    pub fn resolve_formula(&self, query: &str) -> Result<&CatalogEntry> {
        let query = query.trim();
        if let Some(entry) = self.formula(query) {
            return Ok(entry);
        }
        if let Some(entry) = self
            .formulas
            .iter()
            .find(|e| e.formula.name.eq_ignore_ascii_case(query))
        {
            return Ok(entry);
        }
        self.find_formula(query)
            .first()
            .map(|(entry, _)| *entry)
            .ok_or_else(|| DietError::UnknownFormula(query.to_string()))
    }

    /// Resolve a formula for a role, warning when it is tagged for another use.
    fn resolve_for_role(
        &self,
        query: &str,
        role: FormulaRole,
        disease: &Disease,
    ) -> Result<FormulaReference> {
        let entry = self.resolve_formula(query)?;
        if entry.role != role {
            warn!(
                formula = %entry.id,
                catalog_role = %entry.role,
                used_as = %role,
                "formula used outside its catalog role"
            );
        }
        if !entry.applies_to(&disease.id) {
            warn!(
                formula = %entry.id,
                disease = %disease.id,
                "formula is not tagged for this disease"
            );
        }
        Ok(entry.formula.clone())
    }

    /// Turn a request that names library entries into engine inputs.
    pub fn resolve_inputs(&self, request: &CalculationRequest) -> Result<CalculationInputs> {
        let disease = self.disease(&request.disease)?;

        let optional = |query: &Option<String>, role: FormulaRole| {
            query
                .as_deref()
                .map(|q| self.resolve_for_role(q, role, disease))
                .transpose()
        };

        Ok(CalculationInputs {
            weight_kg: request.weight_kg,
            feeds_per_day: request.feeds_per_day,
            scoop_size_g: request.scoop_size_g,
            water_per_scoop_ml: request.water_per_scoop_ml,
            target_mode: request.target_mode,
            age_group_index: request.age_group_index,
            disease: disease.clone(),
            standard: self.resolve_for_role(&request.standard, FormulaRole::Standard, disease)?,
            special: optional(&request.special, FormulaRole::Special)?,
            modular: optional(&request.modular, FormulaRole::Modular)?,
        })
    }
}
