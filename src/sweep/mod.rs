pub mod evaluation;
pub mod output;
pub mod runner;
pub mod sampling;

pub use evaluation::{CaseResult, Check, Violation, evaluate_case};
pub use output::{print_violations, write_csv, write_summary_json};
pub use runner::{SweepConfig, SweepResults, SweepSummary, run_sweep};
pub use sampling::{SampleRanges, SampledCase};
