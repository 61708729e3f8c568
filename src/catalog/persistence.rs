use std::fs;
use std::path::Path;

use tracing::info;

use crate::catalog::library::Library;
use crate::error::Result;
use crate::models::formula::CustomFormula;

/// Illustrative library shipped with the binary.
const BUILTIN_LIBRARY: &str = include_str!("../../data/library.json");

/// Parse and validate a library document.
pub fn parse_library(json: &str) -> Result<Library> {
    let library: Library = serde_json::from_str(json)?;
    library.validate()?;
    Ok(library)
}

/// The library embedded at compile time.
pub fn builtin_library() -> Result<Library> {
    parse_library(BUILTIN_LIBRARY)
}

/// Load a library from a JSON file.
pub fn load_library<P: AsRef<Path>>(path: P) -> Result<Library> {
    let content = fs::read_to_string(path.as_ref())?;
    let library = parse_library(&content)?;
    info!(
        path = %path.as_ref().display(),
        diseases = library.diseases.len(),
        formulas = library.formulas.len(),
        "loaded library"
    );
    Ok(library)
}

/// Save a library as pretty-printed JSON.
pub fn save_library<P: AsRef<Path>>(path: P, library: &Library) -> Result<()> {
    let json = serde_json::to_string_pretty(library)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load user-authored formulas from a JSON array.
pub fn load_custom_formulas<P: AsRef<Path>>(path: P) -> Result<Vec<CustomFormula>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
