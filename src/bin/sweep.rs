use std::path::PathBuf;

use clap::Parser;

use metabolic_diet_calc_rs::catalog::{builtin_library, load_custom_formulas, load_library};
use metabolic_diet_calc_rs::error::Result;
use metabolic_diet_calc_rs::logging::{LogConfig, init_logging};
use metabolic_diet_calc_rs::sweep::{
    SampleRanges, SweepConfig, print_violations, run_sweep, write_csv, write_summary_json,
};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Randomized invariant sweep for the feeding plan engine")]
struct Args {
    /// Number of random cases
    #[arg(long, default_value = "1000")]
    iters: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Library JSON file (defaults to the built-in library)
    #[arg(long)]
    library: Option<PathBuf>,

    /// Custom formulas merged into the library
    #[arg(long)]
    custom: Option<PathBuf>,

    /// Upper bound of sampled body weight in kg
    #[arg(long, default_value = "25")]
    max_weight: f64,

    /// Output CSV file for all cases
    #[arg(long, default_value = "sweep_results.csv")]
    csv: PathBuf,

    /// Output JSON file for the summary and failing cases
    #[arg(long, default_value = "sweep_summary.json")]
    json: PathBuf,

    /// Number of failing cases to print
    #[arg(long, default_value = "10")]
    show: usize,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every case passed.
fn run() -> Result<bool> {
    let args = Args::parse();
    init_logging(&LogConfig::from_verbosity(args.verbose));

    let mut library = match &args.library {
        Some(path) => load_library(path)?,
        None => builtin_library()?,
    };
    if let Some(path) = &args.custom {
        library.add_custom(&load_custom_formulas(path)?)?;
    }

    println!(
        "Sweeping {} cases over {} diseases and {} formulas",
        args.iters,
        library.diseases.len(),
        library.formulas.len()
    );

    let defaults = SampleRanges::default();
    let config = SweepConfig {
        iterations: args.iters,
        seed: args.seed,
        ranges: SampleRanges {
            weight_kg: (defaults.weight_kg.0, args.max_weight.max(defaults.weight_kg.0)),
            ..defaults
        },
    };

    let run = run_sweep(&config, &library)?;
    print_violations(&run.summary, &run.results, args.show);

    write_csv(&run.results, &args.csv)?;
    println!("Wrote all cases to {:?}", args.csv);

    write_summary_json(&run.summary, &run.results, &args.json)?;
    println!("Wrote summary to {:?}", args.json);

    Ok(run.summary.failed_cases == 0)
}
