mod library;
mod persistence;

pub use library::{CalculationRequest, CatalogEntry, FUZZY_MATCH_THRESHOLD, Library};
pub use persistence::{
    builtin_library, load_custom_formulas, load_library, parse_library, save_library,
};
