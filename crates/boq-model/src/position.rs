//! Raw input rows and canonical BOQ positions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::drawing::LinkedSpec;
use crate::enrichment::EnrichmentResult;
use crate::validation::{Classification, ValidationResult};

/// One row as delivered by an upstream parser: an ordered mapping of
/// header label to cell value plus optional source metadata.
///
/// Input-only; discarded after normalization. Columns the header resolver
/// does not recognize stay in `cells` untouched and are reported through
/// normalization statistics rather than dropped silently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    /// Header label → cell value, in source column order.
    pub cells: Vec<(String, String)>,
    /// Sheet the row came from, if the source format has sheets.
    #[serde(default)]
    pub sheet_name: Option<String>,
    /// Opaque source reference (file/row coordinate) for diagnostics.
    #[serde(default)]
    pub source_ref: Option<String>,
    /// Raw cell values in source order, independent of headers.
    #[serde(default)]
    pub raw_values: Vec<String>,
    /// Value of the leading cell, used for section-row detection.
    #[serde(default)]
    pub first_cell: Option<String>,
}

impl RawRow {
    /// Builds a row from `(header, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let cells: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(h, v)| (h.into(), v.into()))
            .collect();
        let raw_values: Vec<String> = cells.iter().map(|(_, v)| v.clone()).collect();
        let first_cell = raw_values.first().cloned();
        Self {
            cells,
            sheet_name: None,
            source_ref: None,
            raw_values,
            first_cell,
        }
    }
}

/// Section metadata keyed by numeric code prefix (3 digits, with a
/// 1-digit fallback), supplied by the catalog provider.
pub type SectionIndex = BTreeMap<String, SectionInfo>;

/// Section metadata attached from the code-prefix index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub code: String,
    pub name: String,
    /// Section type label from the provider (e.g. construction division).
    pub kind: Option<String>,
}

/// A normalized BOQ position.
///
/// Created by the normalizer, augmented by the schema validator, matcher,
/// drawing-spec linker and compliance validator, and finalized with a
/// classification before leaving the pipeline.
///
/// Invariants: `description` is non-empty for any record that survives
/// normalization; numeric fields are either a finite number or `None`,
/// never a sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalPosition {
    /// Input-order stamp; output ordering is restored by this index
    /// regardless of enrichment execution order.
    pub row_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    /// True when the row references a resource table (materials, labour,
    /// machinery). Kept in the position list.
    #[serde(default)]
    pub resource_row: bool,
    /// Unrecognized extra columns, preserved for diagnostics.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_spec: Option<LinkedSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_from_pairs_captures_first_cell() {
        let row = RawRow::from_pairs([("Kód", "121101"), ("Popis", "Sejmutí ornice")]);
        assert_eq!(row.first_cell.as_deref(), Some("121101"));
        assert_eq!(row.raw_values.len(), 2);
    }

    #[test]
    fn canonical_position_serializes_without_absent_fields() {
        let pos = CanonicalPosition {
            row_index: 0,
            description: "Concrete slab".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&pos).unwrap();
        assert!(!json.contains("quantity"));
        assert!(!json.contains("classification"));
    }
}
