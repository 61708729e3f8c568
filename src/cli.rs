use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::formula::FormulaRole;
use crate::models::nutrient::TargetMode;

/// Metabolic diet calculator: guideline targets and formula blending for inborn errors of metabolism.
#[derive(Parser, Debug)]
#[command(name = "metabolic_diet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Library JSON file (diseases and formulas). Defaults to the built-in library.
    #[arg(short, long, global = true)]
    pub library: Option<PathBuf>,

    /// JSON array of custom formulas merged into the library.
    #[arg(short, long, global = true)]
    pub custom: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prompt for settings and compute a plan.
    Interactive,

    /// Compute a plan from command-line settings.
    Calc(CalcArgs),

    /// List formulas in the library.
    Formulas {
        /// Only formulas applicable to this disease id.
        #[arg(long)]
        disease: Option<String>,

        /// Only formulas with this role.
        #[arg(long, value_enum)]
        role: Option<FormulaRole>,
    },

    /// Show the age-group guidelines for a disease.
    Guidelines {
        /// Disease id or name.
        disease: String,
    },

    /// Write the active library (including custom formulas) to a JSON file.
    ExportLibrary {
        /// Destination path.
        path: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Interactive
    }
}

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    /// Disease id or name.
    #[arg(short, long)]
    pub disease: String,

    /// Age group index (clamped to the available groups).
    #[arg(short, long, default_value_t = 0)]
    pub age_group: usize,

    /// Body weight in kg.
    #[arg(short, long)]
    pub weight: f64,

    #[arg(long, default_value_t = 8)]
    pub feeds: u32,

    /// Grams of powder per scoop.
    #[arg(long, default_value_t = 4.5)]
    pub scoop: f64,

    /// Millilitres of water per scoop.
    #[arg(long, default_value_t = 30.0)]
    pub water: f64,

    #[arg(short = 'm', long, value_enum, default_value_t = TargetMode::Mid)]
    pub target_mode: TargetMode,

    /// Standard formula (id or name).
    #[arg(short, long)]
    pub standard: String,

    /// Special (restricted) formula (id or name).
    #[arg(long)]
    pub special: Option<String>,

    /// Modular formula (id or name).
    #[arg(long)]
    pub modular: Option<String>,

    /// Print the outputs as JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}
