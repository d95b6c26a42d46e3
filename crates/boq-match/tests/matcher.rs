//! Code-matcher resolution behavior over a small catalog.

use boq_match::catalog::{CatalogIndex, CatalogRecord};
use boq_match::{MatchConfig, SectionIndex, extract_bundle, match_position};
use boq_model::{CanonicalPosition, MatchGrade};

fn record(code: &str, name: &str, unit: Option<&str>) -> CatalogRecord {
    CatalogRecord {
        code: code.to_string(),
        aliases: Vec::new(),
        bridge_codes: Vec::new(),
        name: name.to_string(),
        description: None,
        unit: unit.map(String::from),
        system: Some("OTSKP".to_string()),
        tech_spec: None,
    }
}

fn position(code: Option<&str>, desc: &str, unit: Option<&str>) -> CanonicalPosition {
    CanonicalPosition {
        code: code.map(str::to_string),
        description: desc.to_string(),
        unit: unit.map(str::to_string),
        ..CanonicalPosition::default()
    }
}

fn resolve(pos: &CanonicalPosition, index: &CatalogIndex, config: &MatchConfig) -> boq_model::EnrichmentResult {
    let bundle = extract_bundle(&pos.description, pos.unit.as_deref());
    match_position(pos, &bundle, index, config)
}

#[test]
fn exact_code_hit_scores_one() {
    let index = CatalogIndex::build(
        vec![record("121101", "Sejmutí ornice tl. do 200 mm", Some("m3"))],
        SectionIndex::new(),
    )
    .unwrap();
    let pos = position(Some("121101"), "Sejmutí ornice", Some("m3"));
    let result = resolve(&pos, &index, &MatchConfig::default());

    assert_eq!(result.grade, MatchGrade::Exact);
    assert_eq!(result.score, 1.0);
    assert_eq!(result.candidates.len(), 1);
    assert!(!result.evidence.is_empty());
}

#[test]
fn alias_hit_is_exact_at_ninety_five() {
    let mut rec = record("272311", "Beton základových pasů", Some("m3"));
    rec.bridge_codes.push("KROS-27231".to_string());
    let index = CatalogIndex::build(vec![rec], SectionIndex::new()).unwrap();
    let pos = position(Some("KROS-27231"), "Beton základových pasů", Some("m3"));
    let result = resolve(&pos, &index, &MatchConfig::default());

    assert_eq!(result.grade, MatchGrade::Exact);
    assert_eq!(result.score, 0.95);
}

#[test]
fn identical_description_without_code_is_partial_not_exact() {
    // two entries with the same name; the tie breaks on the lower code
    let index = CatalogIndex::build(
        vec![
            record("272312", "Beton základů prostý", Some("m3")),
            record("272311", "Beton základů prostý", Some("m3")),
        ],
        SectionIndex::new(),
    )
    .unwrap();
    let pos = position(None, "Beton základů prostý", None);
    let result = resolve(&pos, &index, &MatchConfig::default());

    assert_eq!(result.grade, MatchGrade::Partial);
    assert_eq!(result.candidates[0].code, "272311");
}

#[test]
fn marker_agreement_carries_a_weak_description() {
    // wording differs a lot; the shared C25/30 + XC2 markers decide
    let index = CatalogIndex::build(
        vec![
            record(
                "274313",
                "Vodostavební beton konstrukcí přehrad C25/30 XC2",
                Some("m3"),
            ),
            record("966071", "Bourání zábradlí mostního", Some("m")),
        ],
        SectionIndex::new(),
    )
    .unwrap();
    let pos = position(None, "Beton C25/30 XC2", Some("m3"));
    let result = resolve(&pos, &index, &MatchConfig::default());

    assert_eq!(result.grade, MatchGrade::Partial);
    assert!(result.score >= 0.65);
    assert_eq!(result.candidates[0].code, "274313");
    assert!(!result.evidence.is_empty());
}

#[test]
fn unrelated_text_yields_none_without_candidates() {
    let index = CatalogIndex::build(
        vec![record("272311", "Beton základových pasů", Some("m3"))],
        SectionIndex::new(),
    )
    .unwrap();
    let pos = position(None, "Lešení fasádní trubkové", Some("m2"));
    let result = resolve(&pos, &index, &MatchConfig::default());

    assert_eq!(result.grade, MatchGrade::None);
    assert_eq!(result.score, 0.0);
    assert!(result.candidates.is_empty());
}

#[test]
fn strict_thresholds_demote_to_none_but_keep_candidates() {
    let index = CatalogIndex::build(
        vec![record("272311", "Beton základů prostý", Some("m3"))],
        SectionIndex::new(),
    )
    .unwrap();
    let pos = position(None, "Beton základů prostý", Some("m3"));

    let strict = MatchConfig {
        desc_strong: 1.1,
        marker_top_min: 1.1,
        desc_top_min: 1.1,
        ..MatchConfig::default()
    };
    let result = resolve(&pos, &index, &strict);

    // the candidate list survives for reviewer advice even when no
    // decision rule accepts it
    assert_eq!(result.grade, MatchGrade::None);
    assert!(!result.candidates.is_empty());
    assert!(result.evidence.iter().any(|e| e.contains("272311")));
}

#[test]
fn candidate_list_is_ranked_and_truncated() {
    let index = CatalogIndex::build(
        vec![
            record("272311", "Beton základů prostý", Some("m3")),
            record("272321", "Beton základů železový", Some("m3")),
            record("272331", "Beton základů prokládaný", Some("m3")),
        ],
        SectionIndex::new(),
    )
    .unwrap();
    let pos = position(None, "Beton základů prostý", Some("m3"));
    let config = MatchConfig {
        top_candidates: 2,
        ..MatchConfig::default()
    };
    let result = resolve(&pos, &index, &config);

    assert_eq!(result.candidates.len(), 2);
    assert!(result.candidates[0].score >= result.candidates[1].score);
    assert_eq!(result.candidates[0].code, "272311");
}
