//! CLI argument definitions for the BOQ auditor.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "boq-audit",
    version,
    about = "Audit a bill of quantities against a catalog of standard codes",
    long_about = "Reconcile free-form BOQ line items against a canonical catalog \
                  (OTSKP/KROS-style codes), link drawing specifications, apply \
                  domain compliance rules and classify every position GREEN, \
                  AMBER or RED."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit one BOQ file against a catalog.
    Audit(AuditArgs),
}

#[derive(Parser)]
pub struct AuditArgs {
    /// BOQ line items as CSV (first row holds the column headers).
    #[arg(value_name = "BOQ_CSV")]
    pub boq: PathBuf,

    /// Catalog records as JSON.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Section index records as JSON.
    #[arg(long = "sections", value_name = "PATH")]
    pub sections: Option<PathBuf>,

    /// Pre-extracted drawing specifications as JSON.
    #[arg(long = "specs", value_name = "PATH")]
    pub specs: Option<PathBuf>,

    /// Match-configuration TOML overriding the default thresholds.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the full JSON report here (stdout summary only when absent).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
