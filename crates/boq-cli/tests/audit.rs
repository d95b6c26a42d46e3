//! End-to-end `audit` command tests over temporary files.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use boq_cli::cli::AuditArgs;
use boq_cli::commands::{read_boq_csv, run_audit};
use boq_model::Classification;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const BOQ_CSV: &str = "\
K\u{f3}d,Popis,MJ,Mno\u{17e}stv\u{ed}
121101,Sejmut\u{ed} ornice,m3,\"150,5\"
999999,Nezn\u{e1}m\u{e1} polo\u{17e}ka bez obdoby,kus,
";

const CATALOG_JSON: &str = r#"[
  {"code": "121101", "name": "Sejmutí ornice", "unit": "m3"}
]"#;

#[test]
fn audit_runs_and_writes_a_report() {
    let dir = TempDir::new().unwrap();
    let args = AuditArgs {
        boq: write(&dir, "boq.csv", BOQ_CSV),
        catalog: write(&dir, "catalog.json", CATALOG_JSON),
        sections: None,
        specs: None,
        config: None,
        output: Some(dir.path().join("report.json")),
    };

    let outcome = run_audit(&args).unwrap();
    assert_eq!(outcome.positions.len(), 2);
    assert_eq!(outcome.stats.count_of(Classification::Green), 1);
    assert_eq!(outcome.stats.count_of(Classification::Red), 1);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["positions"].as_array().unwrap().len(), 2);
    assert_eq!(report["positions"][0]["classification"], "GREEN");
    assert!(report["meta"]["catalog_fingerprint"].is_string());
}

#[test]
fn csv_rows_carry_headers_and_source_refs() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "boq.csv", BOQ_CSV);

    let rows = read_boq_csv(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cells[0].0, "Kód");
    assert_eq!(rows[0].cells[0].1, "121101");
    assert_eq!(rows[0].source_ref.as_deref(), Some("boq.csv:2"));
    assert_eq!(rows[1].first_cell.as_deref(), Some("999999"));
}

#[test]
fn config_toml_overrides_are_applied() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "match.toml", "name = \"strict\"\nfuzzy_floor = 0.6\n");
    let args = AuditArgs {
        boq: write(&dir, "boq.csv", BOQ_CSV),
        catalog: write(&dir, "catalog.json", CATALOG_JSON),
        sections: None,
        specs: None,
        config: Some(config),
        output: None,
    };

    let outcome = run_audit(&args).unwrap();
    assert_eq!(outcome.meta.config_name, "strict");
}

#[test]
fn missing_catalog_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let args = AuditArgs {
        boq: write(&dir, "boq.csv", BOQ_CSV),
        catalog: dir.path().join("missing.json"),
        sections: None,
        specs: None,
        config: None,
        output: None,
    };
    assert!(run_audit(&args).is_err());
}
