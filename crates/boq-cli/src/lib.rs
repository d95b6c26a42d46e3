//! BOQ audit CLI.
//!
//! Thin I/O surface over `boq-core`: reads a BOQ CSV, a catalog JSON and
//! optional drawing-spec/config files, runs the audit and writes a JSON
//! report plus a terminal summary table.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
