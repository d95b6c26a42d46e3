//! Compliance-validator scenarios over a small catalog.

use boq_match::catalog::{CatalogIndex, CatalogRecord};
use boq_match::{MatchConfig, SectionIndex, extract_bundle};
use boq_model::{
    Candidate, CanonicalPosition, EnrichmentResult, MatchGrade, ValidationStatus,
};
use boq_validate::validate_position;

fn record(code: &str, name: &str, unit: Option<&str>) -> CatalogRecord {
    CatalogRecord {
        code: code.to_string(),
        aliases: Vec::new(),
        bridge_codes: Vec::new(),
        name: name.to_string(),
        description: None,
        unit: unit.map(String::from),
        system: None,
        tech_spec: None,
    }
}

fn catalog() -> CatalogIndex {
    CatalogIndex::build(
        vec![
            record("121101", "Sejmutí ornice", Some("m3")),
            record("272313", "Beton základových pasů C25/30", Some("m3")),
            record("998000", "Poznámková položka", None),
        ],
        SectionIndex::new(),
    )
    .unwrap()
}

fn position(code: Option<&str>, desc: &str, unit: Option<&str>, qty: Option<f64>) -> CanonicalPosition {
    CanonicalPosition {
        code: code.map(str::to_string),
        description: desc.to_string(),
        unit: unit.map(str::to_string),
        quantity: qty,
        ..CanonicalPosition::default()
    }
}

fn enrichment(grade: MatchGrade, score: f64, candidates: Vec<Candidate>) -> EnrichmentResult {
    EnrichmentResult {
        grade,
        score,
        evidence: vec!["description similarity 0.91".to_string()],
        candidates,
    }
}

fn candidate(code: &str, name: &str, unit: Option<&str>, score: f64) -> Candidate {
    Candidate {
        code: code.to_string(),
        name: name.to_string(),
        unit: unit.map(String::from),
        score,
    }
}

#[test]
fn matching_unit_passes_clean() {
    let pos = position(Some("121101"), "Sejmutí ornice", Some("m3"), Some(150.5));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert_eq!(result.status, ValidationStatus::Passed);
}

#[test]
fn unit_mismatch_is_an_error() {
    let pos = position(Some("121101"), "Sejmutí ornice", Some("m2"), Some(10.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert!(result.has_errors());
    assert!(result.errors[0].contains("unit mismatch"));
}

#[test]
fn missing_unit_against_catalog_is_a_warning() {
    let pos = position(Some("121101"), "Sejmutí ornice", None, Some(10.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert_eq!(result.status, ValidationStatus::Warning);
}

#[test]
fn qualified_soft_match_is_a_warning_with_advice() {
    let pos = position(None, "Beton základových pasů C25/30", Some("m3"), Some(20.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let candidates = vec![
        candidate("272313", "Beton základových pasů C25/30", Some("m3"), 0.88),
        candidate("272321", "Beton základů železový", Some("m3"), 0.61),
    ];
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Partial, 0.88, candidates),
        &catalog(),
        &MatchConfig::default(),
    );
    assert_eq!(result.status, ValidationStatus::Warning);
    assert!(result.warnings[0].contains("272313"));
    let advice = result.extras.get("soft_match_advice").unwrap();
    assert!(advice.contains("272313"));
    assert!(advice.contains("272321"));
}

#[test]
fn soft_match_below_score_gate_is_code_not_found() {
    let pos = position(Some("999999"), "Beton základů", Some("m3"), Some(20.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let candidates = vec![candidate("272313", "Beton základových pasů", Some("m3"), 0.55)];
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::None, 0.55, candidates),
        &catalog(),
        &MatchConfig::default(),
    );
    assert!(result.has_errors());
    assert!(result.errors[0].contains("code not found"));
}

#[test]
fn soft_match_with_incompatible_unit_is_rejected() {
    let pos = position(None, "Beton základových pasů C25/30", Some("t"), Some(20.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let candidates = vec![candidate("272313", "Beton základových pasů", Some("m3"), 0.88)];
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Partial, 0.88, candidates),
        &catalog(),
        &MatchConfig::default(),
    );
    assert!(result.has_errors());
}

#[test]
fn unparsable_quantity_dominates_missing() {
    let mut pos = position(Some("121101"), "Sejmutí ornice", Some("m3"), None);
    pos.extras
        .insert("quantity_raw".to_string(), "cca 15".to_string());
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert!(result.has_errors());
    assert!(result.errors[0].contains("cca 15"));
}

#[test]
fn missing_quantity_alone_is_a_warning() {
    let pos = position(Some("121101"), "Sejmutí ornice", Some("m3"), None);
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert_eq!(result.status, ValidationStatus::Warning);
    assert!(result.warnings[0].contains("quantity missing"));
}

#[test]
fn non_positive_quantity_is_an_error() {
    let pos = position(Some("121101"), "Sejmutí ornice", Some("m3"), Some(0.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert!(result.has_errors());
}

#[test]
fn non_cost_bearing_code_is_a_warning() {
    let pos = position(Some("998000"), "Poznámka k výkazu", None, Some(1.0));
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert_eq!(result.status, ValidationStatus::Warning);
    assert!(result.warnings[0].contains("cost-bearing"));
}

#[test]
fn exposure_strength_violation_is_an_error() {
    let pos = position(
        Some("272313"),
        "Beton základových pasů C16/20 XF4",
        Some("m3"),
        Some(20.0),
    );
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    let result = validate_position(
        &pos,
        &bundle,
        &enrichment(MatchGrade::Exact, 1.0, Vec::new()),
        &catalog(),
        &MatchConfig::default(),
    );
    assert!(result.has_errors());
    assert!(result.errors.iter().any(|e| e.contains("below minimum")));
}
