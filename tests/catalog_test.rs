use std::io::Write;

use tempfile::NamedTempFile;

use metabolic_diet_calc_rs::DietError;
use metabolic_diet_calc_rs::catalog::{builtin_library, load_custom_formulas, parse_library};
use metabolic_diet_calc_rs::models::FormulaRole;

#[test]
fn test_builtin_diseases() {
    let library = builtin_library().unwrap();

    let pku = library.disease("pku").unwrap();
    assert_eq!(pku.primary_limiter.as_deref(), Some("Phenylalanine"));
    assert!(pku.age_groups.len() >= 4);
    assert_eq!(library.disease("Phenylketonuria").unwrap().id, "pku");

    let tyr = library.disease("tyr1").unwrap();
    assert_eq!(
        tyr.primary_limiter.as_deref(),
        Some("Phenylalanine+Tyrosine")
    );

    assert!(library.disease("maple syrup urine disease").is_ok());
    assert!(matches!(
        library.disease("gsd1a"),
        Err(DietError::UnknownDisease(_))
    ));
}

#[test]
fn test_every_disease_has_standard_and_special() {
    let library = builtin_library().unwrap();
    for disease in &library.diseases {
        assert!(
            !library
                .formulas_for(Some(FormulaRole::Standard), Some(&disease.id))
                .is_empty(),
            "{} has no standard formula",
            disease.id
        );
        assert!(
            !library
                .formulas_for(Some(FormulaRole::Special), Some(&disease.id))
                .is_empty(),
            "{} has no special formula",
            disease.id
        );
    }
}

#[test]
fn test_special_formulas_are_disease_specific() {
    let library = builtin_library().unwrap();
    let pku_special = library.formulas_for(Some(FormulaRole::Special), Some("pku"));
    assert_eq!(pku_special.len(), 1);
    assert_eq!(pku_special[0].id, "phe-free-infant");
    assert_eq!(pku_special[0].formula.value("Phenylalanine"), Some(0.0));
}

#[test]
fn test_fuzzy_lookup() {
    let library = builtin_library().unwrap();

    let hits = library.find_formula("glucose polymr");
    assert_eq!(hits[0].0.id, "glucose-polymer");
    assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));

    assert_eq!(
        library.resolve_formula("bcaa free infant").unwrap().id,
        "bcaa-free-infant"
    );
    assert!(library.find_formula("qqqqqqqq").is_empty());
}

#[test]
fn test_custom_formulas_merge() {
    let mut library = builtin_library().unwrap();
    let before = library.formulas.len();

    let json = r#"[
        {"id": "home-energy", "name": "Home Energy Blend", "basis": "100g", "role": "modular",
         "values": {"Energy": 400, "Carbohydrate": 100, "Protein": 0, "Fat": null}},
        {"id": "glucose-polymer", "name": "Glucose Polymer (new label)", "basis": "100g",
         "role": "modular", "values": {"Energy": 384, "Carbohydrate": 96}}
    ]"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let customs = load_custom_formulas(file.path()).unwrap();
    library.add_custom(&customs).unwrap();

    assert_eq!(library.formulas.len(), before + 1);
    let home = library.formula("home-energy").unwrap();
    assert_eq!(home.formula.value("Fat"), None);
    assert_eq!(home.formula.value("Protein"), Some(0.0));
    assert!(home.applies_to("msud"));
    assert_eq!(
        library.formula("glucose-polymer").unwrap().formula.value("Energy"),
        Some(384.0)
    );
}

#[test]
fn test_custom_formula_with_unknown_key_is_rejected() {
    let mut library = builtin_library().unwrap();
    let json = r#"[
        {"id": "bad", "name": "Bad", "basis": "100g", "role": "special",
         "values": {"Methionine": 0}}
    ]"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let customs = load_custom_formulas(file.path()).unwrap();
    assert!(matches!(
        library.add_custom(&customs),
        Err(DietError::UnknownNutrient { .. })
    ));
}

#[test]
fn test_parse_rejects_negative_formula_value() {
    let json = r#"{
        "diseases": [{
            "id": "pku", "name": "PKU", "trackedNutrients": ["Phenylalanine"],
            "ageGroups": [{"ageLabel": "infant",
                "nutrients": [{"nutrient": "Phenylalanine", "min": 20, "max": 60, "unit": "mg/kg/day"}]}]
        }],
        "formulas": [
            {"id": "f", "role": "standard", "name": "F", "basis": "100g",
             "values": {"Phenylalanine": -1}}
        ]
    }"#;
    assert!(matches!(
        parse_library(json),
        Err(DietError::InvalidFormula { .. })
    ));
}

#[test]
fn test_parse_rejects_missing_max() {
    let json = r#"{
        "diseases": [{
            "id": "pku", "name": "PKU", "trackedNutrients": ["Phenylalanine"],
            "ageGroups": [{"ageLabel": "infant",
                "nutrients": [{"nutrient": "Phenylalanine", "min": 20, "unit": "mg/kg/day"}]}]
        }],
        "formulas": []
    }"#;
    assert!(matches!(
        parse_library(json),
        Err(DietError::InvalidRange { .. })
    ));
}
