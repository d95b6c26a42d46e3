//! Row normalization: heterogeneous raw rows → canonical positions.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use boq_model::{CanonicalPosition, RawRow};

use crate::headers::{Field, HeaderMap, resolve_headers};
use crate::numbers::{NumberToken, parse_eu};

/// Accepted catalog-code shape: 4-6 digits, optionally suffixed by
/// `.`/`-` plus alphanumerics. Anything else is dropped from the code
/// field without failing the row.
static CODE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,6}(?:[.-][A-Za-z0-9]+)?$").expect("code regex"));

/// Numbered (`1.`, `2.3`) or roman-numeral heading in the leading cell,
/// optionally followed by a title. Catalog codes are 4+ digits and do
/// not match the short numeric prefix.
static HEADING_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\d{1,3}(?:\.\d{1,3})*[.)]?|[IVXLCDM]{1,7}[.)])(?:\s+.*)?$")
        .expect("heading regex")
});

const SUMMARY_KEYWORDS: [&str; 5] = ["celkem", "soucet", "mezisoucet", "rekapitulace", "souhrn"];

const RESOURCE_KEYWORDS: [&str; 4] = ["hzs", "presun hmot", "rozbor tov", "rezijni naklady"];

/// Counters and diagnostics from one normalization pass.
///
/// Invariant: `raw_total == normalized_total + section_rows + dropped_rows`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeStats {
    pub raw_total: usize,
    pub normalized_total: usize,
    pub section_rows: usize,
    pub dropped_rows: usize,
    /// Rows kept but flagged as resource-table references.
    pub resource_rows: usize,
    /// Codes removed for not matching the accepted shape.
    pub codes_dropped: usize,
    /// Share of first-row headers the alias table resolved.
    pub format_confidence: f64,
    /// First row's header label → canonical field name.
    pub header_map: BTreeMap<String, String>,
    pub unknown_headers: Vec<String>,
    pub locale: String,
}

/// Normalizes raw rows into canonical positions.
///
/// Section rows are excluded from the output (but counted); rows without
/// a usable description are dropped and counted; a malformed cell never
/// drops the row it sits in.
pub fn normalize_rows(rows: &[RawRow]) -> (Vec<CanonicalPosition>, NormalizeStats) {
    let mut stats = NormalizeStats {
        raw_total: rows.len(),
        locale: "eu".to_string(),
        ..NormalizeStats::default()
    };
    let mut positions = Vec::with_capacity(rows.len());

    for (row_index, row) in rows.iter().enumerate() {
        let header_map = resolve_headers(row.cells.iter().map(|(h, _)| h.as_str()));
        if row_index == 0 {
            stats.format_confidence = header_map.confidence();
            stats.unknown_headers = header_map.unknown.clone();
            stats.header_map = header_map
                .resolved
                .iter()
                .map(|(header, field)| (header.clone(), field.as_str().to_string()))
                .collect();
        }

        match normalize_row(row, row_index, &header_map, &mut stats) {
            RowOutcome::Position(position) => {
                if position.resource_row {
                    stats.resource_rows += 1;
                }
                positions.push(*position);
            }
            RowOutcome::Section => {
                stats.section_rows += 1;
                debug!(row = row_index, "section row excluded from positions");
            }
            RowOutcome::Dropped => {
                stats.dropped_rows += 1;
                warn!(row = row_index, "row dropped: no usable description");
            }
        }
    }

    stats.normalized_total = positions.len();
    (positions, stats)
}

enum RowOutcome {
    Position(Box<CanonicalPosition>),
    Section,
    Dropped,
}

fn normalize_row(
    row: &RawRow,
    row_index: usize,
    header_map: &HeaderMap,
    stats: &mut NormalizeStats,
) -> RowOutcome {
    let mut code: Option<String> = None;
    let mut description = String::new();
    let mut unit: Option<String> = None;
    let mut quantity = NumberToken::Absent;
    let mut unit_price = NumberToken::Absent;
    let mut total_price = NumberToken::Absent;
    let mut extras = BTreeMap::new();

    for (header, value) in &row.cells {
        match header_map.field_for(header) {
            Some(Field::Code) => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    code = Some(trimmed.to_string());
                }
            }
            Some(Field::Description) => description = collapse_whitespace(value),
            Some(Field::Unit) => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    unit = Some(trimmed.to_string());
                }
            }
            Some(Field::Quantity) => quantity = parse_eu(value),
            Some(Field::UnitPrice) => unit_price = parse_eu(value),
            Some(Field::TotalPrice) => total_price = parse_eu(value),
            None => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    extras.insert(header.clone(), trimmed.to_string());
                }
            }
        }
    }

    // keep the raw text of unparsable numerics for downstream validation
    if let NumberToken::Invalid(raw) = &quantity {
        extras.insert("quantity_raw".to_string(), raw.clone());
    }
    if let NumberToken::Invalid(raw) = &unit_price {
        extras.insert("unit_price_raw".to_string(), raw.clone());
    }
    if let NumberToken::Invalid(raw) = &total_price {
        extras.insert("total_price_raw".to_string(), raw.clone());
    }

    let no_numeric_data = quantity.value().is_none()
        && unit_price.value().is_none()
        && total_price.value().is_none();

    if no_numeric_data && is_section_row(row, &description) {
        return RowOutcome::Section;
    }

    if description.is_empty() {
        return RowOutcome::Dropped;
    }

    if let Some(raw_code) = &code
        && !CODE_SHAPE.is_match(raw_code)
    {
        debug!(row = row_index, code = %raw_code, "code dropped: invalid shape");
        stats.codes_dropped += 1;
        code = None;
    }

    let resource_row = is_resource_row(&description);

    RowOutcome::Position(Box::new(CanonicalPosition {
        row_index,
        code,
        description,
        quantity: quantity.value(),
        unit,
        unit_price: unit_price.value(),
        total_price: total_price.value(),
        section: None,
        sheet_name: row.sheet_name.clone(),
        source_ref: row.source_ref.clone(),
        resource_row,
        extras,
        enrichment: None,
        linked_spec: None,
        validation: None,
        classification: None,
    }))
}

fn is_section_row(row: &RawRow, description: &str) -> bool {
    if let Some(first) = row.first_cell.as_deref() {
        let trimmed = first.trim();
        if !trimmed.is_empty() && HEADING_SHAPE.is_match(trimmed) {
            return true;
        }
    }
    let folded = fold(description);
    if folded.is_empty() {
        return false;
    }
    SUMMARY_KEYWORDS
        .iter()
        .any(|keyword| folded.contains(keyword))
}

fn is_resource_row(description: &str) -> bool {
    let folded = fold(description);
    RESOURCE_KEYWORDS
        .iter()
        .any(|keyword| folded.contains(keyword))
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        let folded = match ch {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'č' | 'ç' => 'c',
            'ď' => 'd',
            'é' | 'ě' | 'è' | 'ë' => 'e',
            'í' | 'î' | 'ï' => 'i',
            'ň' => 'n',
            'ó' | 'ô' | 'ö' => 'o',
            'ř' => 'r',
            'š' => 's',
            'ť' => 't',
            'ú' | 'ů' | 'ü' => 'u',
            'ý' => 'y',
            'ž' => 'z',
            _ if ch.is_ascii_alphanumeric() => ch,
            _ => ' ',
        };
        out.push(folded);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
