//! Catalog-match outcome attached to a position.

use serde::{Deserialize, Serialize};

/// Match quality of the catalog resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchGrade {
    /// Code resolved through the code or alias/bridge index.
    Exact,
    /// Accepted on description or marker evidence below an exact hit.
    Partial,
    /// No candidate cleared the decision rule.
    None,
}

impl std::fmt::Display for MatchGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Partial => write!(f, "partial"),
            Self::None => write!(f, "none"),
        }
    }
}

/// One ranked catalog candidate reported to the reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub score: f64,
}

/// Result of resolving a position against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResult {
    #[serde(rename = "match")]
    pub grade: MatchGrade,
    /// Confidence in [0, 1]. Exact hits always score 1.0 (code) or 0.95
    /// (alias/bridge).
    pub score: f64,
    /// Bounded, human-readable justification; always names the decisive
    /// reason.
    pub evidence: Vec<String>,
    /// Top candidates by final score, descending.
    pub candidates: Vec<Candidate>,
}

impl EnrichmentResult {
    pub fn none() -> Self {
        Self {
            grade: MatchGrade::None,
            score: 0.0,
            evidence: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.grade == MatchGrade::Exact
    }
}
