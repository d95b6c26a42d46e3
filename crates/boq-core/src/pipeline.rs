//! The audit pipeline: normalize → schema-validate → enrich → validate
//! → classify.
//!
//! A fatal catalog failure aborts before any position is processed.
//! Per-position enrichment runs on a rayon parallel iterator against the
//! immutable catalog index; `collect` restores input order, and every
//! position carries its input-order stamp regardless.

use rayon::prelude::*;
use tracing::info;

use boq_ingest::{normalize_rows, validate_schema};
use boq_match::catalog::{CatalogIndex, CatalogRecord, SectionRecord, build_section_index};
use boq_match::{MatchConfig, extract_bundle, link_best_spec, match_position};
use boq_model::{
    CanonicalPosition, Classification, DrawingSpecification, RawRow, Result, ValidationStatus,
};
use boq_validate::{classify, validate_position};

use crate::stats::{AuditStats, EnrichStats, RunMeta, ValidationStats};

/// The sole hand-off artifact of one audit run.
#[derive(Debug)]
pub struct AuditOutcome {
    pub positions: Vec<CanonicalPosition>,
    pub stats: AuditStats,
    pub meta: RunMeta,
}

/// Runs the full audit over in-memory inputs.
///
/// Only catalog construction can fail; every row-level problem is
/// recovered locally and surfaces in statistics or on the position.
pub fn run(
    catalog: Vec<CatalogRecord>,
    sections: Vec<SectionRecord>,
    rows: &[RawRow],
    drawing_specs: &[DrawingSpecification],
    config: &MatchConfig,
) -> Result<AuditOutcome> {
    let index = CatalogIndex::build(catalog, build_section_index(sections))?;
    info!(
        entries = index.len(),
        fingerprint = %&index.fingerprint()[..12],
        "catalog index built"
    );

    let (positions, normalize_stats) = normalize_rows(rows);
    info!(
        raw = normalize_stats.raw_total,
        normalized = normalize_stats.normalized_total,
        sections = normalize_stats.section_rows,
        dropped = normalize_stats.dropped_rows,
        "rows normalized"
    );

    let (positions, schema_stats) = validate_schema(positions, index.sections());
    info!(
        validated = schema_stats.validated_total,
        duplicates = schema_stats.duplicates_removed,
        "schema validated"
    );

    let positions: Vec<CanonicalPosition> = positions
        .into_par_iter()
        .map(|position| enrich_position(position, &index, drawing_specs, config))
        .collect();

    let mut enrich = EnrichStats::default();
    let mut validation = ValidationStats::default();
    let mut stats = AuditStats {
        normalize: normalize_stats,
        schema: schema_stats,
        ..AuditStats::default()
    };
    for position in &positions {
        if let Some(enrichment) = &position.enrichment {
            enrich.record(enrichment.grade);
        }
        if position.linked_spec.is_some() {
            enrich.spec_linked += 1;
        }
        if let Some(result) = &position.validation {
            match result.status {
                ValidationStatus::Passed => validation.passed += 1,
                ValidationStatus::Warning => validation.warnings += 1,
                ValidationStatus::Failed => validation.failed += 1,
            }
        }
        if let Some(classification) = position.classification {
            *stats.classification_counts.entry(classification).or_default() += 1;
        }
    }
    stats.enrich = enrich;
    stats.validation = validation;
    info!(
        green = stats.count_of(Classification::Green),
        amber = stats.count_of(Classification::Amber),
        red = stats.count_of(Classification::Red),
        "positions classified"
    );

    let meta = RunMeta::new(index.fingerprint(), &config.name);
    Ok(AuditOutcome {
        positions,
        stats,
        meta,
    })
}

fn enrich_position(
    mut position: CanonicalPosition,
    index: &CatalogIndex,
    drawing_specs: &[DrawingSpecification],
    config: &MatchConfig,
) -> CanonicalPosition {
    let bundle = extract_bundle(&position.description, position.unit.as_deref());
    let mut enrichment = match_position(&position, &bundle, index, config);

    if let Some((linked, spec_score)) =
        link_best_spec(&position, &bundle, drawing_specs, &config.linker)
    {
        // an accepted drawing link raises the confidence floor, capped so
        // it can never outrank a code-based hit
        enrichment.score = enrichment
            .score
            .max(spec_score.min(config.linker.score_floor_cap));
        position.linked_spec = Some(linked);
    }

    let mut validation = validate_position(&position, &bundle, &enrichment, index, config);
    let classification = classify(&validation, &enrichment);

    // AMBER must always carry a reason the reviewer can read
    if classification == Classification::Amber && validation.warnings.is_empty() {
        validation.push_warning(match enrichment.candidates.first() {
            Some(top) => format!(
                "match is {} (score {:.2}); closest catalog entry {} '{}'",
                enrichment.grade, enrichment.score, top.code, top.name
            ),
            None => format!(
                "match is {} (score {:.2}); no catalog candidate to compare against",
                enrichment.grade, enrichment.score
            ),
        });
    }

    position.enrichment = Some(enrichment);
    position.validation = Some(validation);
    position.classification = Some(classification);
    position
}
