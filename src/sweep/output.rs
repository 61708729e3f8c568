use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sweep::evaluation::CaseResult;
use crate::sweep::runner::SweepSummary;

/// Write one row per case to a CSV file.
pub fn write_csv(results: &[CaseResult], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "index",
        "disease",
        "age_group",
        "weight_kg",
        "feeds_per_day",
        "scoop_size_g",
        "water_per_scoop_ml",
        "target_mode",
        "standard",
        "special",
        "modular",
        "standard_amount",
        "special_amount",
        "modular_amount",
        "total_kcal",
        "total_protein",
        "final_volume_ml",
        "low",
        "high",
        "notes",
        "violations",
    ])?;

    for result in results {
        let case = &result.case;
        let violations: Vec<String> = result
            .violations
            .iter()
            .map(|v| v.check.to_string())
            .collect();

        wtr.write_record([
            result.index.to_string(),
            case.disease.clone(),
            case.age_group_index.to_string(),
            format!("{:.3}", case.weight_kg),
            case.feeds_per_day.to_string(),
            format!("{:.3}", case.scoop_size_g),
            format!("{:.1}", case.water_per_scoop_ml),
            case.target_mode.to_string(),
            case.standard.clone(),
            case.special.clone().unwrap_or_default(),
            case.modular.clone().unwrap_or_default(),
            format!("{:.3}", result.standard_amount),
            format!("{:.3}", result.special_amount),
            format!("{:.3}", result.modular_amount),
            format!("{:.1}", result.total_kcal),
            format!("{:.2}", result.total_protein),
            format!("{:.1}", result.final_volume_ml),
            result.low_count.to_string(),
            result.high_count.to_string(),
            result.note_count.to_string(),
            violations.join(";"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the summary and every failing case to a JSON file.
pub fn write_summary_json(
    summary: &SweepSummary,
    results: &[CaseResult],
    path: &Path,
) -> Result<()> {
    let failures: Vec<&CaseResult> = results.iter().filter(|r| !r.passed()).collect();
    let json = serde_json::json!({
        "summary": summary,
        "failures": failures,
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}

/// Print the summary and up to `limit` failing cases to stdout.
pub fn print_violations(summary: &SweepSummary, results: &[CaseResult], limit: usize) {
    println!("\n=== Sweep Summary (seed {}) ===\n", summary.seed);
    println!("Cases:        {}", summary.cases);
    println!("Failed cases: {}", summary.failed_cases);
    println!("With LOW:     {}", summary.cases_with_low);
    println!("With HIGH:    {}", summary.cases_with_high);
    for (disease, count) in &summary.per_disease {
        println!("  {:<12} {}", disease, count);
    }

    if summary.failed_cases == 0 {
        println!("\nAll checks passed.");
        return;
    }

    println!();
    for (check, count) in &summary.violations {
        println!("{}: {} violations", check, count);
    }

    println!();
    for result in results.iter().filter(|r| !r.passed()).take(limit) {
        println!("#{}: {}", result.index, result.case.display());
        for violation in &result.violations {
            println!("    [{}] {}", violation.check, violation.detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_library;
    use crate::sweep::runner::{SweepConfig, run_sweep};
    use tempfile::tempdir;

    #[test]
    fn test_write_csv_and_summary() {
        let library = builtin_library().unwrap();
        let config = SweepConfig {
            iterations: 5,
            ..Default::default()
        };
        let run = run_sweep(&config, &library).unwrap();
        let dir = tempdir().unwrap();

        let csv_path = dir.path().join("sweep.csv");
        write_csv(&run.results, &csv_path).unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 6);
        assert!(content.starts_with("index,disease,age_group"));

        let json_path = dir.path().join("summary.json");
        write_summary_json(&run.summary, &run.results, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["summary"]["cases"], 5);
        assert!(value["failures"].as_array().unwrap().is_empty());
    }
}
