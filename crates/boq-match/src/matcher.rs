//! Code matcher: resolves a position to catalog entries.
//!
//! Resolution order, first success wins: exact code hit, alias/bridge
//! hit, weighted fuzzy scoring. Fuzzy scoring combines token Jaccard,
//! string similarity, a unit bonus and per-category marker bonuses; the
//! decision rule over the ranked candidates is driven entirely by
//! [`MatchConfig`] thresholds.

use std::cmp::Ordering;

use boq_model::{Candidate, CanonicalPosition, EnrichmentResult, MatchGrade};

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::config::MatchConfig;
use crate::markers::{TokenBundle, normalize_unit};
use crate::similarity::{jaccard, shares_token, string_similarity};

struct ScoredEntry<'a> {
    entry: &'a CatalogEntry,
    base: f64,
    marker_bonus: f64,
    final_score: f64,
}

/// Resolves one position against the catalog.
///
/// `bundle` is the marker extraction of the position's description and
/// unit; it is computed by the caller so the same bundle can be reused by
/// the drawing-spec linker and compliance validation.
pub fn match_position(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    index: &CatalogIndex,
    config: &MatchConfig,
) -> EnrichmentResult {
    if let Some(code) = position.code.as_deref() {
        if let Some(entry) = index.exact(code) {
            return exact_result(entry, code, 1.0, "exact code hit", config);
        }
        if let Some(entry) = index.alias(code) {
            return exact_result(entry, code, 0.95, "alias/bridge code hit", config);
        }
    }

    fuzzy_match(position, bundle, index, config)
}

fn exact_result(
    entry: &CatalogEntry,
    code: &str,
    score: f64,
    reason: &str,
    config: &MatchConfig,
) -> EnrichmentResult {
    let evidence = vec![cap_evidence(
        format!("code {code} resolved to {} '{}' ({reason})", entry.code, entry.name),
        config,
    )];
    EnrichmentResult {
        grade: MatchGrade::Exact,
        score,
        evidence,
        candidates: vec![candidate_of(entry, score)],
    }
}

fn fuzzy_match(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    index: &CatalogIndex,
    config: &MatchConfig,
) -> EnrichmentResult {
    let position_unit = position.unit.as_deref().map(normalize_unit);

    let mut scored: Vec<ScoredEntry<'_>> = Vec::new();
    for entry in index.entries() {
        // token prefilter: entries sharing no token cannot clear the floor
        if !shares_token(&bundle.tokens, &entry.bundle.tokens) {
            continue;
        }
        let base = jaccard(&bundle.tokens, &entry.bundle.tokens)
            .max(string_similarity(&bundle.normalized, &entry.bundle.normalized));

        let mut bonus = 0.0;
        if let (Some(pos_unit), Some(entry_unit)) =
            (position_unit.as_deref(), entry.normalized_unit.as_deref())
            && pos_unit == entry_unit
        {
            bonus += config.unit_bonus;
        }
        let marker_bonus = marker_overlap_bonus(bundle, &entry.bundle, config);
        bonus += marker_bonus;

        let final_score = (base + bonus).min(1.0);
        if final_score < config.fuzzy_floor {
            continue;
        }
        scored.push(ScoredEntry {
            entry,
            base,
            marker_bonus,
            final_score,
        });
    }

    scored.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entry.normalized_code.cmp(&b.entry.normalized_code))
    });
    scored.truncate(config.top_candidates);

    let candidates: Vec<Candidate> = scored
        .iter()
        .map(|s| candidate_of(s.entry, s.final_score))
        .collect();

    let Some(top) = scored.first() else {
        return EnrichmentResult::none();
    };
    let second_score = scored.get(1).map(|s| s.final_score).unwrap_or(0.0);

    let mut evidence = Vec::new();
    let grade = if top.base >= config.desc_strong {
        evidence.push(format!(
            "description similarity {:.2} to {} '{}'",
            top.base, top.entry.code, top.entry.name
        ));
        MatchGrade::Partial
    } else if top.marker_bonus > 0.0
        && top.final_score - second_score >= config.marker_gap
        && top.final_score >= config.marker_top_min
    {
        evidence.push(format!(
            "technical markers agree with {} '{}' (lead {:.2} over next candidate)",
            top.entry.code,
            top.entry.name,
            top.final_score - second_score
        ));
        push_marker_evidence(&mut evidence, bundle, &top.entry.bundle);
        MatchGrade::Partial
    } else if top.base >= config.desc_base_min && top.final_score >= config.desc_top_min {
        evidence.push(format!(
            "description similarity {:.2} with score {:.2} to {} '{}'",
            top.base, top.final_score, top.entry.code, top.entry.name
        ));
        MatchGrade::Partial
    } else {
        evidence.push(format!(
            "no candidate cleared decision thresholds (best {:.2} at {})",
            top.final_score, top.entry.code
        ));
        MatchGrade::None
    };

    evidence.truncate(config.evidence_max_entries);
    let evidence = evidence
        .into_iter()
        .map(|entry| cap_evidence(entry, config))
        .collect();

    EnrichmentResult {
        grade,
        score: top.final_score,
        evidence,
        candidates,
    }
}

/// Each category with a non-empty marker overlap contributes its weight
/// once; the sum is capped.
fn marker_overlap_bonus(a: &TokenBundle, b: &TokenBundle, config: &MatchConfig) -> f64 {
    let mut bonus = 0.0;
    for (category, markers) in &a.markers {
        if markers.is_empty() {
            continue;
        }
        if let Some(other) = b.markers_for(*category)
            && markers.intersection(other).next().is_some()
        {
            bonus += config.marker_weights.weight(*category);
        }
    }
    bonus.min(config.marker_bonus_cap)
}

fn push_marker_evidence(evidence: &mut Vec<String>, a: &TokenBundle, b: &TokenBundle) {
    for (category, markers) in &a.markers {
        let Some(other) = b.markers_for(*category) else {
            continue;
        };
        let shared: Vec<&str> = markers
            .intersection(other)
            .map(String::as_str)
            .collect();
        if !shared.is_empty() {
            evidence.push(format!("{}: {}", category.as_str(), shared.join(", ")));
        }
    }
}

fn candidate_of(entry: &CatalogEntry, score: f64) -> Candidate {
    Candidate {
        code: entry.code.clone(),
        name: entry.name.clone(),
        unit: entry.unit.clone(),
        score,
    }
}

fn cap_evidence(mut entry: String, config: &MatchConfig) -> String {
    if entry.len() > config.evidence_max_len {
        let mut cut = config.evidence_max_len;
        while cut > 0 && !entry.is_char_boundary(cut) {
            cut -= 1;
        }
        entry.truncate(cut);
    }
    entry
}
