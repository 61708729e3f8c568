use crate::catalog::CatalogEntry;
use crate::models::nutrient::{Disease, NutrientRange};
use crate::models::plan::{
    BalanceStatus, CalculationOutputs, FormulaContribution, FormulaPlan, NutrientBalance,
    ResolvedTarget,
};

fn opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", decimals, v))
}

fn status_marker(status: BalanceStatus) -> &'static str {
    match status {
        BalanceStatus::Low => "v",
        BalanceStatus::Normal => " ",
        BalanceStatus::High => "^",
    }
}

/// Display the full result of one calculation.
pub fn display_outputs(outputs: &CalculationOutputs) {
    println!();
    match &outputs.age_label {
        Some(age) => println!(
            "=== {} ({}, {} target) ===",
            outputs.disease, age, outputs.target_mode
        ),
        None => println!("=== {} ===", outputs.disease),
    }

    let h = &outputs.highlights;
    println!();
    println!("Energy:  {} kcal/day", opt(h.energy_kcal, 0));
    println!("Protein: {} g/day", opt(h.protein_g, 1));
    println!("Fluid:   {} mL/day", opt(h.fluid_ml, 0));
    if let Some(limiter) = &h.primary_limiter {
        println!(
            "{}: {} {}",
            limiter.nutrient,
            opt(limiter.value, 0),
            limiter.unit
        );
    }

    display_targets(&outputs.targets);
    display_plan(&outputs.plan);
    display_balance(&outputs.balance);

    if !outputs.notes.is_empty() {
        println!();
        println!("--- Notes ---");
        for note in &outputs.notes {
            println!("  * {}", note);
        }
    }
    println!();
}

/// Display resolved daily targets.
pub fn display_targets(targets: &[ResolvedTarget]) {
    if targets.is_empty() {
        return;
    }

    println!();
    println!("--- Daily Targets ---");
    let width = targets.iter().map(|t| t.nutrient.len()).max().unwrap_or(10);

    for t in targets {
        let range = match (t.total_max, t.min_only) {
            (_, true) | (None, _) => format!(">= {:.1}", t.total_min),
            (Some(max), false) => format!("{:.1} - {:.1}", t.total_min, max),
        };
        println!(
            "  {:<width$}  {:>20}  target {:>9.1} {}",
            t.nutrient,
            range,
            t.total_target,
            t.total_unit,
            width = width
        );
    }
}

fn display_item(item: &FormulaContribution, width: usize) {
    let limiter = item
        .primary_limiter_delivered
        .map(|v| format!(" | limiter {:.0} mg", v))
        .unwrap_or_default();

    println!(
        "  {:<8} {:<width$}  {:>7.1} {:<2} | {:>5.0} kcal | {:>5.1} g protein{}",
        item.role.to_string(),
        item.formula_name,
        item.amount,
        item.amount_unit.short(),
        item.kcal,
        item.protein,
        limiter,
        width = width
    );

    match (item.scoops, item.water_ml) {
        (Some(scoops), Some(water)) => println!(
            "  {:<8} {:<width$}  {:.1} scoops + {:.0} mL water/day; per feed {:.1} g, {} scoops, {} mL water",
            "",
            "",
            scoops,
            water,
            item.per_feed_amount,
            opt(item.per_feed_scoops, 1),
            opt(item.per_feed_water_ml, 0),
            width = width
        ),
        _ => println!(
            "  {:<8} {:<width$}  per feed {:.0} mL",
            "",
            "",
            item.per_feed_amount,
            width = width
        ),
    }
}

/// Display the sized formulas and preparation totals.
pub fn display_plan(plan: &FormulaPlan) {
    println!();
    println!("--- Formula Plan ---");

    let width = plan
        .items
        .iter()
        .map(|i| i.formula_name.len())
        .max()
        .unwrap_or(10);
    for item in &plan.items {
        display_item(item, width);
    }

    let t = &plan.totals;
    println!();
    println!("Total energy:  {:.0} kcal", t.kcal);
    println!("Total protein: {:.1} g", t.protein);
    if let Some(limiter) = t.primary_limiter {
        println!("Primary limiter delivered: {:.0} mg", limiter);
    }
    if t.powder_g > 0.0 {
        println!(
            "Powder: {:.1} g ({:.1} scoops) in {:.0} mL water",
            t.powder_g, t.scoops, t.water_ml
        );
    }
    if t.ready_to_feed_ml > 0.0 {
        println!("Ready-to-feed liquid: {:.0} mL", t.ready_to_feed_ml);
    }
    println!(
        "Final volume: {:.0} mL/day ({:.0} mL and {:.1} scoops per feed)",
        t.final_volume_ml, t.per_feed_volume_ml, t.per_feed_scoops
    );
    if plan.protein_deficit > 0.0 {
        println!("Protein still short: {:.1} g", plan.protein_deficit);
    }
    if plan.energy_deficit > 0.0 {
        println!("Energy still short: {:.0} kcal", plan.energy_deficit);
    }
}

/// Display delivered amounts against each target.
pub fn display_balance(balance: &[NutrientBalance]) {
    if balance.is_empty() {
        return;
    }

    println!();
    println!("--- Nutrient Balance ---");
    let width = balance.iter().map(|b| b.nutrient.len()).max().unwrap_or(10);

    for b in balance {
        let gap = if b.deficit_to_target > 0.0 {
            format!("-{:.1}", b.deficit_to_target)
        } else if b.excess_to_target > 0.0 {
            format!("+{:.1}", b.excess_to_target)
        } else {
            String::new()
        };
        println!(
            "{} {:<width$}  {:>9.1} / {:>9.1} {:<9} {:<6} {}",
            status_marker(b.status),
            b.nutrient,
            b.delivered,
            b.target,
            b.unit.label(),
            b.status,
            gap,
            width = width
        );
    }
}

/// Display catalog entries.
pub fn display_formula_list(entries: &[&CatalogEntry], title: &str) {
    if entries.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} formulas) ===", title, entries.len());
    println!();

    for entry in entries {
        let tags = if entry.diseases.is_empty() {
            "any".to_string()
        } else {
            entry.diseases.join(", ")
        };
        let values: Vec<String> = entry
            .formula
            .values
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        println!(
            "  {} [{}] {} per {} (for {})",
            entry.id,
            entry.role,
            entry.formula.name,
            entry.formula.basis,
            tags
        );
        println!("      {}", values.join(", "));
    }

    println!();
}

fn range_text(range: &NutrientRange) -> String {
    match (range.max, range.min_only) {
        (Some(max), false) => format!("{} - {} {}", range.min, max, range.unit),
        _ => format!(">= {} {}", range.min, range.unit),
    }
}

/// Display every age group and guideline range for a disease.
pub fn display_guidelines(disease: &Disease) {
    println!();
    println!("=== {} ({}) ===", disease.name, disease.id);
    if let Some(limiter) = &disease.primary_limiter {
        println!("Primary limiter: {}", limiter);
    }

    for (index, group) in disease.age_groups.iter().enumerate() {
        println!();
        println!("[{}] {}", index, group.age_label);
        let width = group
            .nutrients
            .iter()
            .map(|n| n.nutrient.len())
            .max()
            .unwrap_or(10);
        for range in &group.nutrients {
            println!(
                "    {:<width$}  {}",
                range.nutrient,
                range_text(range),
                width = width
            );
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::unit::Unit;

    #[test]
    fn test_range_text() {
        let band = NutrientRange::new("Phenylalanine", 25.0, 70.0, Unit::MgPerKgDay);
        assert_eq!(range_text(&band), "25 - 70 mg/kg/day");

        let floor = NutrientRange::floor("Tyrosine", 300.0, Some(350.0), Unit::MgPerKgDay);
        assert_eq!(range_text(&floor), ">= 300 mg/kg/day");
    }

    #[test]
    fn test_opt_formatting() {
        assert_eq!(opt(None, 1), "-");
        assert_eq!(opt(Some(12.345), 1), "12.3");
    }
}
