use clap::Parser;
use tracing::{info, warn};

use metabolic_diet_calc_rs::catalog::{
    CalculationRequest, Library, builtin_library, load_custom_formulas, load_library,
    save_library,
};
use metabolic_diet_calc_rs::cli::{CalcArgs, Cli, Command};
use metabolic_diet_calc_rs::error::Result;
use metabolic_diet_calc_rs::interface::{
    collect_request, display_formula_list, display_guidelines, display_outputs, prompt_yes_no,
};
use metabolic_diet_calc_rs::logging::{LogConfig, init_logging};
use metabolic_diet_calc_rs::planner::calculate_diet;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let library = open_library(&cli)?;
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Interactive => cmd_interactive(&library),
        Command::Calc(args) => cmd_calc(&library, args),
        Command::Formulas { disease, role } => {
            if let Some(id) = &disease {
                library.disease(id)?;
            }
            let entries = library.formulas_for(role, disease.as_deref());
            display_formula_list(&entries, "Formulas");
            Ok(())
        }
        Command::Guidelines { disease } => {
            display_guidelines(library.disease(&disease)?);
            Ok(())
        }
        Command::ExportLibrary { path } => {
            save_library(&path, &library)?;
            println!("Library written to {}", path.display());
            Ok(())
        }
    }
}

/// Load the configured library and merge any custom formulas.
fn open_library(cli: &Cli) -> Result<Library> {
    let mut library = match &cli.library {
        Some(path) => load_library(path)?,
        None => builtin_library()?,
    };

    if let Some(path) = &cli.custom {
        let customs = load_custom_formulas(path)?;
        library.add_custom(&customs)?;
        info!(count = customs.len(), "merged custom formulas");
    }

    Ok(library)
}

/// Compute and show one plan, warning about each advisory.
fn compute(library: &Library, request: &CalculationRequest, json: bool) -> Result<()> {
    let inputs = library.resolve_inputs(request)?;
    let outputs = calculate_diet(&inputs);

    for note in &outputs.notes {
        warn!("{}", note);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        display_outputs(&outputs);
    }
    Ok(())
}

/// Prompt for settings, then compute; repeat while the user asks to.
fn cmd_interactive(library: &Library) -> Result<()> {
    println!(
        "Loaded {} diseases and {} formulas",
        library.diseases.len(),
        library.formulas.len()
    );
    if let Some(description) = &library.description {
        println!("{}", description);
    }
    println!();

    loop {
        let request = collect_request(library)?;
        compute(library, &request, false)?;

        if !prompt_yes_no("Calculate another plan?", false)? {
            break;
        }
    }

    Ok(())
}

fn cmd_calc(library: &Library, args: CalcArgs) -> Result<()> {
    let request = CalculationRequest {
        disease: args.disease,
        age_group_index: args.age_group,
        weight_kg: args.weight,
        feeds_per_day: args.feeds,
        scoop_size_g: args.scoop,
        water_per_scoop_ml: args.water,
        target_mode: args.target_mode,
        standard: args.standard,
        special: args.special,
        modular: args.modular,
    };
    compute(library, &request, args.json)
}
