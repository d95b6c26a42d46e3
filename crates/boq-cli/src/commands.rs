//! The `audit` command: file I/O around the core pipeline.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use boq_core::{AuditOutcome, AuditStats, RunMeta, run};
use boq_match::MatchConfig;
use boq_match::catalog::{CatalogRecord, SectionRecord};
use boq_model::{CanonicalPosition, DrawingSpecification, RawRow};

use crate::cli::AuditArgs;

pub fn run_audit(args: &AuditArgs) -> Result<AuditOutcome> {
    let rows = read_boq_csv(&args.boq)?;

    let catalog: Vec<CatalogRecord> = read_json(&args.catalog).context("read catalog")?;
    let sections: Vec<SectionRecord> = match &args.sections {
        Some(path) => read_json(path).context("read section index")?,
        None => Vec::new(),
    };
    let specs: Vec<DrawingSpecification> = match &args.specs {
        Some(path) => read_json(path).context("read drawing specs")?,
        None => Vec::new(),
    };
    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            MatchConfig::from_toml(&raw).context("parse match config")?
        }
        None => MatchConfig::default(),
    };

    let outcome = run(catalog, sections, &rows, &specs, &config)?;

    if let Some(path) = &args.output {
        write_report(&outcome, path)?;
        info!(path = %path.display(), "report written");
    }

    Ok(outcome)
}

/// Reads a BOQ CSV into raw rows. The first record supplies the header
/// labels; short records are tolerated.
pub fn read_boq_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open BOQ file {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read CSV record {}", idx + 2))?;
        let raw_values: Vec<String> = record.iter().map(str::to_string).collect();
        let first_cell = raw_values.first().cloned();
        let cells = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(RawRow {
            cells,
            sheet_name: None,
            // header occupies line 1
            source_ref: Some(format!("{file_name}:{}", idx + 2)),
            raw_values,
            first_cell,
        });
    }
    Ok(rows)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

#[derive(Serialize)]
struct AuditReport<'a> {
    meta: &'a RunMeta,
    stats: &'a AuditStats,
    positions: &'a [CanonicalPosition],
}

fn write_report(outcome: &AuditOutcome, path: &Path) -> Result<()> {
    let report = AuditReport {
        meta: &outcome.meta,
        stats: &outcome.stats,
        positions: &outcome.positions,
    };
    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
