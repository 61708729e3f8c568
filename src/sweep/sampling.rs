use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::{CalculationRequest, Library};
use crate::models::formula::FormulaRole;
use crate::models::nutrient::TargetMode;

/// Ranges the sweep draws settings from.
///
/// The defaults deliberately reach below the engine's clamps (zero weight,
/// zero feeds, zero scoop) so the clamping paths are exercised too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRanges {
    pub weight_kg: (f64, f64),
    pub feeds_per_day: (u32, u32),
    pub scoop_size_g: (f64, f64),
    pub water_per_scoop_ml: (f64, f64),
    /// Chance that a special formula is selected, when one applies.
    pub special_probability: f64,
    /// Chance that a modular formula is selected, when one applies.
    pub modular_probability: f64,
}

impl Default for SampleRanges {
    fn default() -> Self {
        Self {
            weight_kg: (0.0, 25.0),
            feeds_per_day: (0, 12),
            scoop_size_g: (0.0, 10.0),
            water_per_scoop_ml: (0.0, 60.0),
            special_probability: 0.8,
            modular_probability: 0.5,
        }
    }
}

/// One randomly drawn calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledCase {
    pub disease: String,
    pub age_group_index: usize,
    pub weight_kg: f64,
    pub feeds_per_day: u32,
    pub scoop_size_g: f64,
    pub water_per_scoop_ml: f64,
    pub target_mode: TargetMode,
    pub standard: String,
    pub special: Option<String>,
    pub modular: Option<String>,
}

fn pick_formula(
    rng: &mut impl Rng,
    library: &Library,
    role: FormulaRole,
    disease_id: &str,
    probability: f64,
) -> Option<String> {
    if !rng.gen_bool(probability.clamp(0.0, 1.0)) {
        return None;
    }
    library
        .formulas_for(Some(role), Some(disease_id))
        .choose(rng)
        .map(|e| e.id.clone())
}

impl SampledCase {
    /// Draw a case from the library.
    ///
    /// Returns `None` when the library has no disease or the drawn disease has
    /// no applicable standard formula.
    pub fn random(rng: &mut impl Rng, library: &Library, ranges: &SampleRanges) -> Option<Self> {
        let disease = library.diseases.choose(rng)?;
        let standard = library
            .formulas_for(Some(FormulaRole::Standard), Some(&disease.id))
            .choose(rng)
            .map(|e| e.id.clone())?;

        let age_group_index = rng.gen_range(0..disease.age_groups.len().max(1));
        let target_mode = *[TargetMode::Min, TargetMode::Mid, TargetMode::Max].choose(rng)?;

        Some(Self {
            disease: disease.id.clone(),
            age_group_index,
            weight_kg: rng.gen_range(ranges.weight_kg.0..=ranges.weight_kg.1),
            feeds_per_day: rng.gen_range(ranges.feeds_per_day.0..=ranges.feeds_per_day.1),
            scoop_size_g: rng.gen_range(ranges.scoop_size_g.0..=ranges.scoop_size_g.1),
            water_per_scoop_ml: rng
                .gen_range(ranges.water_per_scoop_ml.0..=ranges.water_per_scoop_ml.1),
            target_mode,
            standard,
            special: pick_formula(
                rng,
                library,
                FormulaRole::Special,
                &disease.id,
                ranges.special_probability,
            ),
            modular: pick_formula(
                rng,
                library,
                FormulaRole::Modular,
                &disease.id,
                ranges.modular_probability,
            ),
        })
    }

    pub fn to_request(&self) -> CalculationRequest {
        CalculationRequest {
            disease: self.disease.clone(),
            age_group_index: self.age_group_index,
            weight_kg: self.weight_kg,
            feeds_per_day: self.feeds_per_day,
            scoop_size_g: self.scoop_size_g,
            water_per_scoop_ml: self.water_per_scoop_ml,
            target_mode: self.target_mode,
            standard: self.standard.clone(),
            special: self.special.clone(),
            modular: self.modular.clone(),
        }
    }

    /// Compact one-line description.
    pub fn display(&self) -> String {
        format!(
            "{}[{}] w={:.2} feeds={} scoop={:.2} water={:.1} {} std={} spc={} mod={}",
            self.disease,
            self.age_group_index,
            self.weight_kg,
            self.feeds_per_day,
            self.scoop_size_g,
            self.water_per_scoop_ml,
            self.target_mode,
            self.standard,
            self.special.as_deref().unwrap_or("-"),
            self.modular.as_deref().unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog::builtin_library;

    #[test]
    fn test_random_case_within_ranges() {
        let library = builtin_library().unwrap();
        let ranges = SampleRanges::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let case = SampledCase::random(&mut rng, &library, &ranges).unwrap();
            let disease = library.disease(&case.disease).unwrap();

            assert!(case.age_group_index < disease.age_groups.len());
            assert!(case.weight_kg >= ranges.weight_kg.0 && case.weight_kg <= ranges.weight_kg.1);
            assert!(case.feeds_per_day <= ranges.feeds_per_day.1);

            let standard = library.formula(&case.standard).unwrap();
            assert_eq!(standard.role, FormulaRole::Standard);
            if let Some(id) = &case.special {
                let special = library.formula(id).unwrap();
                assert_eq!(special.role, FormulaRole::Special);
                assert!(special.applies_to(&disease.id));
            }
        }
    }

    #[test]
    fn test_same_seed_same_cases() {
        let library = builtin_library().unwrap();
        let ranges = SampleRanges::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            assert_eq!(
                SampledCase::random(&mut a, &library, &ranges),
                SampledCase::random(&mut b, &library, &ranges)
            );
        }
    }

    #[test]
    fn test_empty_library_yields_nothing() {
        let library = Library {
            description: None,
            diseases: vec![],
            formulas: vec![],
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SampledCase::random(&mut rng, &library, &SampleRanges::default()).is_none());
    }

    #[test]
    fn test_request_mirrors_case() {
        let library = builtin_library().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let case = SampledCase::random(&mut rng, &library, &SampleRanges::default()).unwrap();
        let request = case.to_request();

        assert_eq!(request.disease, case.disease);
        assert_eq!(request.standard, case.standard);
        assert!(library.resolve_inputs(&request).is_ok());
    }
}
