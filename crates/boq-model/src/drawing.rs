//! Drawing-specification input and the link attached to a position.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A pre-extracted specification snippet from a design drawing.
///
/// Supplied by an external document-understanding collaborator; read-only
/// input to the linker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingSpecification {
    pub file: String,
    pub page: u32,
    /// Anchor within the page (detail label, table cell, callout).
    #[serde(default)]
    pub anchor: Option<String>,
    pub text: String,
    /// Extraction confidence reported by the upstream extractor.
    #[serde(default)]
    pub confidence: f64,
    /// Structured technical values pulled from the snippet
    /// (e.g. "concrete_class" → "C30/37").
    #[serde(default)]
    pub technical_specs: BTreeMap<String, String>,
}

/// Accepted drawing-spec link carried on a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedSpec {
    /// "file p.page anchor" style reference for the audit report.
    pub source_ref: String,
    pub score: f64,
    pub technical_specs: BTreeMap<String, String>,
}
