use thiserror::Error;

#[derive(Debug, Error)]
pub enum DietError {
    #[error("Disease not found: {0}")]
    UnknownDisease(String),

    #[error("Formula not found: {0}")]
    UnknownFormula(String),

    #[error("Unrecognized nutrient '{key}' in {owner}")]
    UnknownNutrient { owner: String, key: String },

    #[error("Invalid range for {nutrient} ({disease}, {age}): {reason}")]
    InvalidRange {
        disease: String,
        age: String,
        nutrient: String,
        reason: String,
    },

    #[error("Invalid formula '{name}': {reason}")]
    InvalidFormula { name: String, reason: String },

    #[error("Disease '{0}' has no age groups")]
    EmptyGuideline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, DietError>;
