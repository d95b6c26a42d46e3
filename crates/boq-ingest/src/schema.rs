//! Schema validation of normalized positions.
//!
//! Re-canonicalizes surviving positions, rejects records without a
//! description, removes near-identical duplicates (first occurrence
//! wins) and attaches section metadata by code prefix. Idempotent: a
//! second pass over its own output changes nothing.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use boq_model::{CanonicalPosition, SectionIndex};

/// Counters from one schema-validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaStats {
    pub input_total: usize,
    pub validated_total: usize,
    pub invalid_total: usize,
    pub duplicates_removed: usize,
    pub sections_classified: usize,
}

/// Validates and deduplicates positions, attaching section metadata.
pub fn validate_schema(
    positions: Vec<CanonicalPosition>,
    sections: &SectionIndex,
) -> (Vec<CanonicalPosition>, SchemaStats) {
    let mut stats = SchemaStats {
        input_total: positions.len(),
        ..SchemaStats::default()
    };
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut validated = Vec::with_capacity(positions.len());

    for mut position in positions {
        canonicalize(&mut position);

        if position.description.is_empty() {
            stats.invalid_total += 1;
            warn!(row = position.row_index, "position rejected: empty description");
            continue;
        }

        if !seen.insert(dedup_key(&position)) {
            stats.duplicates_removed += 1;
            debug!(row = position.row_index, "duplicate position removed");
            continue;
        }

        if position.section.is_none()
            && let Some(info) = position
                .code
                .as_deref()
                .and_then(|code| section_for_code(code, sections))
        {
            position.section = Some(info.clone());
            stats.sections_classified += 1;
        }

        validated.push(position);
    }

    stats.validated_total = validated.len();
    (validated, stats)
}

fn canonicalize(position: &mut CanonicalPosition) {
    if let Some(code) = &position.code {
        let cleaned = code.trim().to_uppercase();
        position.code = (!cleaned.is_empty()).then_some(cleaned);
    }
    if let Some(unit) = &position.unit {
        let cleaned = unit.trim().to_string();
        position.unit = (!cleaned.is_empty()).then_some(cleaned);
    }
    position.description = position
        .description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
}

/// Near-identity key: code, folded description, unit, quantity at
/// millesimal precision. `None` and `Some` never collide.
fn dedup_key(position: &CanonicalPosition) -> String {
    let code = position.code.as_deref().unwrap_or("\u{0}");
    let description = position.description.to_lowercase();
    let unit = position
        .unit
        .as_deref()
        .map(|u| u.to_lowercase())
        .unwrap_or_else(|| "\u{0}".to_string());
    let quantity = match position.quantity {
        Some(q) => format!("{:.3}", q),
        None => "\u{0}".to_string(),
    };
    format!("{code}\u{1}{description}\u{1}{unit}\u{1}{quantity}")
}

/// Looks up section metadata by the code's 3-digit prefix, falling back
/// to the 1-digit prefix.
pub fn section_for_code<'a>(
    code: &str,
    sections: &'a SectionIndex,
) -> Option<&'a boq_model::SectionInfo> {
    let digits: String = code.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    if digits.len() >= 3
        && let Some(info) = sections.get(&digits[..3])
    {
        return Some(info);
    }
    if !digits.is_empty() {
        return sections.get(&digits[..1]);
    }
    None
}
