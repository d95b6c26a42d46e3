//! Audit pipeline orchestration.
//!
//! One entry point, [`pipeline::run`]: raw rows + catalog + drawing
//! specs + config in, classified positions + aggregate statistics out.
//! The pipeline performs no I/O of its own; providers and report writers
//! live outside this crate.

pub mod pipeline;
pub mod stats;

pub use pipeline::{AuditOutcome, run};
pub use stats::{AuditStats, EnrichStats, RunMeta, ValidationStats};
