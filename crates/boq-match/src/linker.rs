//! Drawing-specification linker.
//!
//! Scores every pre-extracted drawing snippet against a position using
//! the same marker primitives as the code matcher and attaches the best
//! one when it clears the acceptance threshold.

use std::cmp::Ordering;

use boq_model::{CanonicalPosition, DrawingSpecification, LinkedSpec};

use crate::catalog::compact_code;
use crate::config::LinkerConfig;
use crate::markers::{MarkerCategory, TokenBundle, extract_bundle};
use crate::similarity::{jaccard, string_similarity};

const MARKER_CATEGORIES: [MarkerCategory; 8] = [
    MarkerCategory::ConcreteClass,
    MarkerCategory::ExposureClass,
    MarkerCategory::SteelGrade,
    MarkerCategory::RebarSpacing,
    MarkerCategory::CoverDepth,
    MarkerCategory::SurfaceCategory,
    MarkerCategory::NormReference,
    MarkerCategory::Geometry,
];

/// Scores one spec against a position bundle. Capped at 1.0.
pub fn score_spec(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    spec: &DrawingSpecification,
    config: &LinkerConfig,
) -> f64 {
    let spec_bundle = extract_bundle(&spec.text, None);

    let mut score = jaccard(&bundle.tokens, &spec_bundle.tokens).min(config.token_overlap_cap);

    if let Some(code) = position.code.as_deref() {
        let compact = compact_code(code);
        if !compact.is_empty()
            && code_tokens(&spec.text).iter().any(|token| *token == compact)
        {
            score += config.code_in_text;
        }
    }

    for category in MARKER_CATEGORIES {
        if let (Some(ours), Some(theirs)) =
            (bundle.markers_for(category), spec_bundle.markers_for(category))
            && ours.intersection(theirs).next().is_some()
        {
            score += config.marker_weight(category);
        }
    }

    score += string_similarity(&bundle.normalized, &spec_bundle.normalized)
        * config.text_similarity_weight;

    if bundle
        .units
        .iter()
        .any(|unit| spec_bundle.units.contains(unit))
    {
        score += config.unit_bonus;
    }

    score.min(1.0)
}

/// Picks the best-scoring spec at or above the acceptance threshold.
///
/// Ties go to the spec with the higher extraction confidence, then to
/// input order, so the outcome is deterministic.
pub fn link_best_spec(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    specs: &[DrawingSpecification],
    config: &LinkerConfig,
) -> Option<(LinkedSpec, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, spec) in specs.iter().enumerate() {
        let score = score_spec(position, bundle, spec, config);
        if score < config.accept_min {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_idx, best_score)) => {
                match score.partial_cmp(&best_score).unwrap_or(Ordering::Equal) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => spec.confidence > specs[best_idx].confidence,
                }
            }
        };
        if better {
            best = Some((idx, score));
        }
    }

    let (idx, score) = best?;
    let spec = &specs[idx];
    let source_ref = match spec.anchor.as_deref() {
        Some(anchor) => format!("{} p.{} {}", spec.file, spec.page, anchor),
        None => format!("{} p.{}", spec.file, spec.page),
    };
    Some((
        LinkedSpec {
            source_ref,
            score,
            technical_specs: spec.technical_specs.clone(),
        },
        score,
    ))
}

/// Uppercased alphanumeric tokens of the spec text. `.` and `-` join
/// within a token, matching how codes are written out; any other
/// character is a boundary, so digits of neighboring values never
/// concatenate into a false code mention.
fn code_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in raw.to_uppercase().chars() {
        if ch.is_ascii_alphanumeric() {
            current.push(ch);
        } else if !matches!(ch, '.' | '-') && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
