use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, trace, warn};

use crate::catalog::Library;
use crate::error::Result;
use crate::sweep::evaluation::{CaseResult, Check, evaluate_case};
use crate::sweep::sampling::{SampleRanges, SampledCase};

/// Configuration for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub iterations: usize,
    pub seed: u64,
    pub ranges: SampleRanges,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 123,
            ranges: SampleRanges::default(),
        }
    }
}

/// Aggregate counts over a sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub seed: u64,
    pub cases: usize,
    pub failed_cases: usize,
    /// Violations per check, keyed by check name.
    pub violations: BTreeMap<String, usize>,
    /// Cases per disease id.
    pub per_disease: BTreeMap<String, usize>,
    pub cases_with_low: usize,
    pub cases_with_high: usize,
}

impl SweepSummary {
    pub fn from_results(seed: u64, results: &[CaseResult]) -> Self {
        let mut summary = Self {
            seed,
            cases: results.len(),
            ..Default::default()
        };

        for result in results {
            *summary
                .per_disease
                .entry(result.case.disease.clone())
                .or_default() += 1;
            if !result.passed() {
                summary.failed_cases += 1;
            }
            if result.low_count > 0 {
                summary.cases_with_low += 1;
            }
            if result.high_count > 0 {
                summary.cases_with_high += 1;
            }
            for violation in &result.violations {
                *summary
                    .violations
                    .entry(violation.check.to_string())
                    .or_default() += 1;
            }
        }

        summary
    }

    pub fn violation_count(&self, check: Check) -> usize {
        self.violations.get(&check.to_string()).copied().unwrap_or(0)
    }
}

/// Results of a sweep run.
pub struct SweepResults {
    pub results: Vec<CaseResult>,
    pub summary: SweepSummary,
}

/// Sample `config.iterations` cases from the library and check each one.
pub fn run_sweep(config: &SweepConfig, library: &Library) -> Result<SweepResults> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut results = Vec::with_capacity(config.iterations);

    info!(iterations = config.iterations, seed = config.seed, "starting sweep");

    for i in 0..config.iterations {
        let Some(case) = SampledCase::random(&mut rng, library, &config.ranges) else {
            warn!("library has no disease with an applicable standard formula");
            break;
        };
        trace!(case = %case.display(), "sampled");

        let inputs = library.resolve_inputs(&case.to_request())?;
        let result = evaluate_case(i, case, &inputs);

        if !result.passed() {
            warn!(index = i, violations = result.violations.len(), "case failed");
        }
        results.push(result);

        // Progress every 10%
        if (i + 1) % (config.iterations / 10).max(1) == 0 {
            let pct = ((i + 1) as f64 / config.iterations as f64) * 100.0;
            info!("{:.0}% complete", pct);
        }
    }

    let summary = SweepSummary::from_results(config.seed, &results);
    Ok(SweepResults { results, summary })
}
