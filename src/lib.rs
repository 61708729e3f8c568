pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod sweep;

pub use error::{DietError, Result};
pub use models::{CalculationInputs, CalculationOutputs};
pub use planner::calculate_diet;
