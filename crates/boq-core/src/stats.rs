//! Aggregate statistics and run metadata.

use std::collections::BTreeMap;

use serde::Serialize;

use boq_ingest::{NormalizeStats, SchemaStats};
use boq_model::{Classification, MatchGrade};

/// Enrichment counters across one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichStats {
    pub exact: usize,
    pub partial: usize,
    pub none: usize,
    /// Positions that got a drawing-spec link attached.
    pub spec_linked: usize,
}

impl EnrichStats {
    pub fn record(&mut self, grade: MatchGrade) {
        match grade {
            MatchGrade::Exact => self.exact += 1,
            MatchGrade::Partial => self.partial += 1,
            MatchGrade::None => self.none += 1,
        }
    }
}

/// Validation counters across one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

/// Everything a report needs to summarize one audit run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditStats {
    pub normalize: NormalizeStats,
    pub schema: SchemaStats,
    pub enrich: EnrichStats,
    pub validation: ValidationStats,
    /// Final position count per GREEN/AMBER/RED.
    pub classification_counts: BTreeMap<Classification, usize>,
}

impl AuditStats {
    pub fn count_of(&self, classification: Classification) -> usize {
        self.classification_counts
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }
}

/// Identity of one audit run, stamped into the report so results can be
/// traced to the exact engine, catalog and config that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    /// RFC 3339 timestamp of the run.
    pub run_at: String,
    pub catalog_fingerprint: String,
    pub config_name: String,
}

impl RunMeta {
    pub fn new(catalog_fingerprint: &str, config_name: &str) -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            catalog_fingerprint: catalog_fingerprint.to_string(),
            config_name: config_name.to_string(),
        }
    }
}
