use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};

use crate::catalog::{CalculationRequest, CatalogEntry, Library};
use crate::error::{DietError, Result};
use crate::models::formula::FormulaRole;
use crate::models::nutrient::{Disease, TargetMode};

/// Prompt for a number, rejecting text that does not parse.
fn prompt_number<T>(prompt: &str, default: &str) -> Result<T>
where
    T: FromStr,
{
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| DietError::InvalidInput(format!("Invalid number: {}", input.trim())))
}

/// Prompt for the disease to plan for.
pub fn prompt_disease(library: &Library) -> Result<&Disease> {
    if library.diseases.is_empty() {
        return Err(DietError::InvalidInput(
            "The library defines no diseases".to_string(),
        ));
    }

    let options: Vec<String> = library
        .diseases
        .iter()
        .map(|d| format!("{} ({})", d.name, d.id))
        .collect();

    let selection = Select::new()
        .with_prompt("Disease")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(&library.diseases[selection])
}

/// Prompt for an age group of the chosen disease.
pub fn prompt_age_group(disease: &Disease) -> Result<usize> {
    let options: Vec<&str> = disease
        .age_groups
        .iter()
        .map(|g| g.age_label.as_str())
        .collect();

    Ok(Select::new()
        .with_prompt("Age group")
        .items(&options)
        .default(0)
        .interact()?)
}

pub fn prompt_target_mode() -> Result<TargetMode> {
    let modes = [TargetMode::Mid, TargetMode::Min, TargetMode::Max];
    let options: Vec<String> = modes.iter().map(|m| m.to_string()).collect();

    let selection = Select::new()
        .with_prompt("Aim for which point of each guideline range?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(modes[selection])
}

/// Search the whole catalog by name with fuzzy matching.
///
/// Returns `None` when the user gives up.
pub fn prompt_formula_search(library: &Library) -> Result<Option<String>> {
    loop {
        let input: String = Input::new()
            .with_prompt("Formula name (or press Enter to go back)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        if let Some(entry) = library.formula(input).or_else(|| {
            library
                .formulas
                .iter()
                .find(|e| e.formula.name.eq_ignore_ascii_case(input))
        }) {
            println!("Selected: {}", entry.formula.name);
            return Ok(Some(entry.id.clone()));
        }

        let candidates = library.find_formula(input);

        if candidates.is_empty() {
            println!("No matching formula found for '{}'", input);
            continue;
        }

        if candidates.len() == 1 {
            let entry = candidates[0].0;
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", entry.formula.name))
                .default(true)
                .interact()?;

            if confirm {
                return Ok(Some(entry.id.clone()));
            }
        } else {
            let options: Vec<&CatalogEntry> = candidates.iter().take(5).map(|(e, _)| *e).collect();
            let mut labels: Vec<String> = options.iter().map(|e| e.formula.name.clone()).collect();
            labels.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&labels)
                .default(0)
                .interact()?;

            if selection < options.len() {
                return Ok(Some(options[selection].id.clone()));
            }
        }
    }
}

/// Prompt for the formula filling one role.
///
/// Lists catalog entries for the role and disease first. Optional roles get a
/// "None" choice. Returns the chosen entry id.
pub fn prompt_formula(
    library: &Library,
    role: FormulaRole,
    disease_id: &str,
    optional: bool,
) -> Result<Option<String>> {
    let entries = library.formulas_for(Some(role), Some(disease_id));

    loop {
        let mut labels: Vec<String> = entries
            .iter()
            .map(|e| format!("{} (per {})", e.formula.name, e.formula.basis))
            .collect();
        labels.push("Search all formulas...".to_string());
        if optional {
            labels.push("None".to_string());
        }

        let selection = Select::new()
            .with_prompt(format!("{} formula", role))
            .items(&labels)
            .default(0)
            .interact()?;

        if selection < entries.len() {
            return Ok(Some(entries[selection].id.clone()));
        }
        if selection > entries.len() {
            return Ok(None);
        }
        if let Some(id) = prompt_formula_search(library)? {
            return Ok(Some(id));
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect every setting for one calculation.
pub fn collect_request(library: &Library) -> Result<CalculationRequest> {
    let disease = prompt_disease(library)?;
    let age_group_index = prompt_age_group(disease)?;

    let weight_kg: f64 = prompt_number("Weight (kg)", "4")?;
    let feeds_per_day: u32 = prompt_number("Feeds per day", "8")?;
    let scoop_size_g: f64 = prompt_number("Scoop size (g)", "4.5")?;
    let water_per_scoop_ml: f64 = prompt_number("Water per scoop (mL)", "30")?;
    let target_mode = prompt_target_mode()?;

    let standard = prompt_formula(library, FormulaRole::Standard, &disease.id, false)?
        .ok_or_else(|| DietError::InvalidInput("A standard formula is required".to_string()))?;
    let special = prompt_formula(library, FormulaRole::Special, &disease.id, true)?;
    let modular = prompt_formula(library, FormulaRole::Modular, &disease.id, true)?;

    Ok(CalculationRequest {
        disease: disease.id.clone(),
        age_group_index,
        weight_kg,
        feeds_per_day,
        scoop_size_g,
        water_per_scoop_ml,
        target_mode,
        standard,
        special,
        modular,
    })
}
