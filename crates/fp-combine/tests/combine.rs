use std::path::Path;

use fp_combine::{CombineError, CombineSpec, combine};
use fp_core::LcId;
use fp_model::{
    ElementDef, FeModel, LcKind, LoadCaseDef, LoadOptions, MemModel, ModelFile,
};

fn model_with_cases(ids: &[i64]) -> MemModel {
    let parsed = ModelFile {
        name: "wing".to_string(),
        nodes: 4,
        connectors: 0,
        coord_systems: 1,
        elements: vec![ElementDef {
            id: 1,
            part: "skin".to_string(),
            kind: "CQUAD4".to_string(),
        }],
        load_cases: ids
            .iter()
            .map(|id| LoadCaseDef {
                id: *id,
                name: format!("subcase {id}"),
            })
            .collect(),
        results: vec![],
    };
    MemModel::from_file(Path::new("inline"), parsed, &LoadOptions::default()).unwrap()
}

#[test]
fn baseline_scenario_creates_expected_cases() {
    // Cases [BASE, 10, 20] plus the thermal case 17500; BASE excluded
    // explicitly rather than by position.
    let mut model = model_with_cases(&[1, 10, 20, 17500]);
    let spec = CombineSpec::new(LcId(17500)).with_baseline(LcId(1));

    let pair = combine(&mut model, &spec).unwrap();

    let derived: Vec<_> = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Derived)
        .collect();
    assert_eq!(derived.len(), 2);
    assert_eq!(derived[0].name, "10+17500");
    assert_eq!(derived[1].name, "20+17500");

    let envelopes: Vec<_> = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Envelope)
        .collect();
    assert_eq!(envelopes.len(), 2);
    assert_eq!(envelopes[0].id, pair.by_value);
    assert_eq!(envelopes[1].id, pair.by_case);
}

#[test]
fn without_baseline_every_non_thermal_case_is_combined() {
    let mut model = model_with_cases(&[1, 10, 20, 17500]);
    let spec = CombineSpec::new(LcId(17500));

    combine(&mut model, &spec).unwrap();

    let derived_count = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Derived)
        .count();
    assert_eq!(derived_count, 3);
}

#[test]
fn one_derived_case_per_mechanical_case() {
    for n in 1..6 {
        let mut ids: Vec<i64> = (1..=n).collect();
        ids.push(17500);
        let mut model = model_with_cases(&ids);
        combine(&mut model, &CombineSpec::new(LcId(17500))).unwrap();

        let derived = model
            .load_cases()
            .iter()
            .filter(|lc| lc.kind == LcKind::Derived)
            .count();
        let envelopes = model
            .load_cases()
            .iter()
            .filter(|lc| lc.kind == LcKind::Envelope)
            .count();
        assert_eq!(derived, n as usize);
        assert_eq!(envelopes, 2);
    }
}

#[test]
fn combining_twice_duplicates_cases() {
    let mut model = model_with_cases(&[10, 17500]);
    let spec = CombineSpec::new(LcId(17500));

    combine(&mut model, &spec).unwrap();
    combine(&mut model, &spec).unwrap();

    let derived = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Derived)
        .count();
    let envelopes = model
        .load_cases()
        .iter()
        .filter(|lc| lc.kind == LcKind::Envelope)
        .count();
    assert_eq!(derived, 2);
    assert_eq!(envelopes, 4);
}

#[test]
fn unknown_thermal_case_is_an_error() {
    let mut model = model_with_cases(&[10, 20]);
    let got = combine(&mut model, &CombineSpec::new(LcId(17500)));
    assert!(matches!(got, Err(CombineError::UnknownThermal(_))));
}

#[test]
fn unknown_baseline_is_an_error() {
    let mut model = model_with_cases(&[10, 17500]);
    let spec = CombineSpec::new(LcId(17500)).with_baseline(LcId(999));
    let got = combine(&mut model, &spec);
    assert!(matches!(got, Err(CombineError::UnknownBaseline(_))));
}

#[test]
fn thermal_only_model_has_nothing_to_combine() {
    let mut model = model_with_cases(&[17500]);
    let got = combine(&mut model, &CombineSpec::new(LcId(17500)));
    assert!(matches!(got, Err(CombineError::NoMechanicalCases)));
}

#[test]
fn non_positive_factor_is_rejected() {
    let mut model = model_with_cases(&[10, 17500]);
    let spec = CombineSpec::new(LcId(17500)).with_factor(0.0);
    let got = combine(&mut model, &spec);
    assert!(matches!(got, Err(CombineError::InvalidFactor(_))));
}
