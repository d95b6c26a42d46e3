//! Catalog matching for BOQ positions.
//!
//! Three pieces live here: the marker extractor (text → token bundle),
//! the code matcher (position → catalog entry via exact/alias/fuzzy
//! resolution) and the drawing-spec linker. All scoring thresholds and
//! weights come from a single [`MatchConfig`] value.

pub mod catalog;
pub mod config;
pub mod linker;
pub mod markers;
pub mod matcher;
pub mod similarity;

pub use boq_model::SectionIndex;
pub use catalog::{CatalogIndex, CatalogRecord, SectionRecord};
pub use config::{LinkerConfig, MarkerWeights, MatchConfig, SoftMatchConfig};
pub use linker::link_best_spec;
pub use markers::{MarkerCategory, TokenBundle, extract_bundle, normalize_text, normalize_unit};
pub use matcher::match_position;
