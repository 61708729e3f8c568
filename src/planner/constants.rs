use crate::models::nutrient::{
    ALPHA_LINOLENIC_ACID, CARBOHYDRATE, ENERGY, FAT, FLUID, LINOLEIC_ACID, PROTEIN,
};

/// Tolerance for deficits, ceilings and status thresholds.
pub const EPSILON: f64 = 1e-6;

/// Smallest scoop size accepted, in grams.
pub const MIN_SCOOP_SIZE_G: f64 = 0.1;

/// Smallest number of feeds per day.
pub const MIN_FEEDS_PER_DAY: u32 = 1;

/// Formula values are expressed per this many grams or millilitres.
pub const BASIS_QUANTITY: f64 = 100.0;

/// Nutrients that never act as an amino-acid ceiling on the standard formula.
pub const NON_AMINO_ACID_NUTRIENTS: [&str; 7] = [
    ENERGY,
    PROTEIN,
    FLUID,
    FAT,
    CARBOHYDRATE,
    LINOLEIC_ACID,
    ALPHA_LINOLENIC_ACID,
];

/// Completion priority for the special formula.
pub const SPECIAL_COMPLETION_ORDER: [&str; 4] = [PROTEIN, ENERGY, CARBOHYDRATE, FAT];

/// Completion priority for the modular formula.
pub const MODULAR_COMPLETION_ORDER: [&str; 4] = [ENERGY, CARBOHYDRATE, FAT, PROTEIN];

// ─────────────────────────────────────────────────────────────────────────────
// Atwater factors (kcal per gram), used for %energy rows
// ─────────────────────────────────────────────────────────────────────────────

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBOHYDRATE: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Energy density of a macronutrient, if it has one.
///
/// The essential fatty acids count at the fat factor.
pub fn atwater_factor(nutrient: &str) -> Option<f64> {
    match nutrient {
        PROTEIN => Some(KCAL_PER_G_PROTEIN),
        CARBOHYDRATE => Some(KCAL_PER_G_CARBOHYDRATE),
        FAT | LINOLEIC_ACID | ALPHA_LINOLENIC_ACID => Some(KCAL_PER_G_FAT),
        _ => None,
    }
}
