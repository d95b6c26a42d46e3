//! Validation outcome and tri-state classification types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Warning,
    Failed,
}

/// Result of compliance validation for one position.
///
/// Errors force a RED classification; warnings are advisory and can cause
/// AMBER. `extras` carries structured side channels such as soft-match
/// advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self {
            status: ValidationStatus::Passed,
            errors: Vec::new(),
            warnings: Vec::new(),
            extras: BTreeMap::new(),
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.status = ValidationStatus::Failed;
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
        if self.status == ValidationStatus::Passed {
            self.status = ValidationStatus::Warning;
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::passed()
    }
}

/// Tri-state severity bucket used to triage which positions need review.
///
/// Always derived from a `ValidationResult` and an enrichment outcome,
/// never cached independently of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Green,
    Amber,
    Red,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "GREEN"),
            Self::Amber => write!(f, "AMBER"),
            Self::Red => write!(f, "RED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_overrides_warning_status() {
        let mut result = ValidationResult::passed();
        result.push_warning("quantity missing");
        assert_eq!(result.status, ValidationStatus::Warning);
        result.push_error("code not found");
        assert_eq!(result.status, ValidationStatus::Failed);
        result.push_warning("late warning");
        assert_eq!(result.status, ValidationStatus::Failed);
    }

    #[test]
    fn classification_serializes_uppercase() {
        let json = serde_json::to_string(&Classification::Amber).unwrap();
        assert_eq!(json, "\"AMBER\"");
    }
}
