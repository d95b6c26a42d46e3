//! Compliance validation and classification.
//!
//! The compliance validator checks a matched position against the
//! cost-bearing catalog subset (unit consistency, confidence-gated soft
//! matching, quantity sanity) and applies material domain rules such as
//! the exposure-class minimum-strength table. The classifier is a pure
//! function from validation and enrichment outcomes to GREEN/AMBER/RED.

pub mod classify;
pub mod compliance;
pub mod rules;

pub use classify::classify;
pub use compliance::validate_position;
