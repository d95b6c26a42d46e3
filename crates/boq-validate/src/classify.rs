//! Tri-state classification.

use boq_model::{Classification, EnrichmentResult, ValidationResult};

/// Derives the severity bucket from the two upstream outcomes.
///
/// Any error is RED, unconditionally. A clean result with an exact
/// catalog hit is GREEN. Everything else needs a reviewer: AMBER.
pub fn classify(validation: &ValidationResult, enrichment: &EnrichmentResult) -> Classification {
    if validation.has_errors() {
        return Classification::Red;
    }
    if validation.warnings.is_empty() && enrichment.is_exact() {
        return Classification::Green;
    }
    Classification::Amber
}
