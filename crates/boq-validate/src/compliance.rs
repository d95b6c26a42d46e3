//! Compliance validation against the cost-bearing catalog subset.

use boq_match::catalog::CatalogIndex;
use boq_match::markers::{TokenBundle, normalize_unit};
use boq_match::MatchConfig;
use boq_model::{CanonicalPosition, EnrichmentResult, MatchGrade, ValidationResult};
use tracing::debug;

use crate::rules;

/// Validates one matched position.
///
/// Errors force RED downstream; warnings are advisory. The position's
/// enrichment is an input here, never mutated.
pub fn validate_position(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    enrichment: &EnrichmentResult,
    index: &CatalogIndex,
    config: &MatchConfig,
) -> ValidationResult {
    let mut result = ValidationResult::passed();

    check_code(position, bundle, enrichment, index, config, &mut result);
    check_quantity(position, &mut result);
    rules::check_concrete_exposure(bundle, &mut result);

    result
}

fn check_code(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    enrichment: &EnrichmentResult,
    index: &CatalogIndex,
    config: &MatchConfig,
    result: &mut ValidationResult,
) {
    let entry = position
        .code
        .as_deref()
        .and_then(|code| index.exact(code).or_else(|| index.alias(code)));

    if let Some(entry) = entry {
        if !entry.is_cost_bearing() {
            result.push_warning(format!(
                "code {} is not cost-bearing in the catalog",
                entry.code
            ));
            return;
        }
        match (&position.unit, &entry.unit) {
            (Some(unit), Some(catalog_unit)) => {
                if normalize_unit(unit) != normalize_unit(catalog_unit) {
                    result.push_error(format!(
                        "unit mismatch for code {}: position '{unit}' vs catalog '{catalog_unit}'",
                        entry.code
                    ));
                }
            }
            (None, Some(catalog_unit)) => {
                result.push_warning(format!(
                    "unit missing; catalog expects '{catalog_unit}' for code {}",
                    entry.code
                ));
            }
            _ => {}
        }
        return;
    }

    // no exact catalog hit; try the confidence-gated soft match over the
    // enrichment candidates
    if try_soft_match(position, bundle, enrichment, config, result) {
        return;
    }

    match position.code.as_deref() {
        Some(code) => result.push_error(format!("code not found in catalog: {code}")),
        None => result.push_error("code missing and no catalog candidate qualified".to_string()),
    }
}

/// Acceptance order: score gate, then evidence gate, then unit
/// compatibility. All three must hold.
fn try_soft_match(
    position: &CanonicalPosition,
    bundle: &TokenBundle,
    enrichment: &EnrichmentResult,
    config: &MatchConfig,
    result: &mut ValidationResult,
) -> bool {
    let Some(top) = enrichment.candidates.first() else {
        return false;
    };
    if top.score < config.soft_match.min_score {
        return false;
    }

    let evidence_backed = bundle.has_markers()
        || enrichment.grade == MatchGrade::Partial
        || enrichment
            .evidence
            .iter()
            .any(|entry| entry.contains("marker") || entry.contains("similarity"));
    if !evidence_backed {
        return false;
    }

    let unit_compatible = match (&position.unit, &top.unit) {
        (Some(unit), Some(candidate_unit)) => {
            normalize_unit(unit) == normalize_unit(candidate_unit)
        }
        _ => true,
    };
    if !unit_compatible {
        debug!(
            row = position.row_index,
            candidate = %top.code,
            "soft match rejected on unit incompatibility"
        );
        return false;
    }

    result.push_warning(format!(
        "no exact catalog code; soft-matched to {} '{}' (score {:.2})",
        top.code, top.name, top.score
    ));
    let advice = enrichment
        .candidates
        .iter()
        .take(config.soft_match.max_advice)
        .map(|candidate| format!("{} {} ({:.2})", candidate.code, candidate.name, candidate.score))
        .collect::<Vec<_>>()
        .join("; ");
    result.extras.insert("soft_match_advice".to_string(), advice);
    result
        .extras
        .insert("soft_match_code".to_string(), top.code.clone());
    true
}

fn check_quantity(position: &CanonicalPosition, result: &mut ValidationResult) {
    match position.quantity {
        Some(quantity) if quantity <= 0.0 => {
            result.push_error(format!("quantity not positive: {quantity}"));
        }
        Some(_) => {}
        None => {
            if let Some(raw) = position.extras.get("quantity_raw") {
                result.push_error(format!("quantity unparsable: '{raw}'"));
            } else {
                result.push_warning("quantity missing".to_string());
            }
        }
    }
}
