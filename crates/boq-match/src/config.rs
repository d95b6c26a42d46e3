//! Matching configuration.
//!
//! Every score threshold and marker weight used by the matcher, linker
//! and soft-match gate lives in one [`MatchConfig`] value so the tuning
//! surface is a single named object rather than constants scattered
//! through the algorithm. Defaults reproduce the audited production
//! behavior; a TOML file can override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markers::MarkerCategory;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid match config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Per-category marker bonus weights used by the code matcher.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerWeights {
    pub concrete_class: f64,
    pub exposure_class: f64,
    pub steel_grade: f64,
    pub rebar_spacing: f64,
    pub cover_depth: f64,
    pub surface_category: f64,
    pub norm_reference: f64,
    pub geometry: f64,
    pub keyword: f64,
}

impl Default for MarkerWeights {
    fn default() -> Self {
        Self {
            concrete_class: 0.12,
            exposure_class: 0.10,
            steel_grade: 0.08,
            rebar_spacing: 0.06,
            cover_depth: 0.05,
            surface_category: 0.03,
            norm_reference: 0.04,
            geometry: 0.03,
            keyword: 0.04,
        }
    }
}

impl MarkerWeights {
    pub fn weight(&self, category: MarkerCategory) -> f64 {
        match category {
            MarkerCategory::ConcreteClass => self.concrete_class,
            MarkerCategory::ExposureClass => self.exposure_class,
            MarkerCategory::SteelGrade => self.steel_grade,
            MarkerCategory::RebarSpacing => self.rebar_spacing,
            MarkerCategory::CoverDepth => self.cover_depth,
            MarkerCategory::SurfaceCategory => self.surface_category,
            MarkerCategory::NormReference => self.norm_reference,
            MarkerCategory::Geometry => self.geometry,
            MarkerCategory::Keyword => self.keyword,
        }
    }
}

/// Weights and acceptance threshold for drawing-spec linking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// Minimum score for a spec to be attached at all.
    pub accept_min: f64,
    /// Cap on the token-overlap contribution.
    pub token_overlap_cap: f64,
    /// Bonus when the position code appears verbatim in the spec text.
    pub code_in_text: f64,
    pub concrete_class: f64,
    pub exposure_class: f64,
    pub steel_grade: f64,
    pub rebar_spacing: f64,
    pub cover_depth: f64,
    pub surface_category: f64,
    pub norm_reference: f64,
    pub geometry: f64,
    /// Multiplier on plain text similarity.
    pub text_similarity_weight: f64,
    pub unit_bonus: f64,
    /// Cap on how far an accepted link can raise the enrichment score.
    pub score_floor_cap: f64,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            accept_min: 0.25,
            token_overlap_cap: 0.35,
            code_in_text: 0.20,
            concrete_class: 0.20,
            exposure_class: 0.15,
            steel_grade: 0.10,
            rebar_spacing: 0.08,
            cover_depth: 0.05,
            surface_category: 0.04,
            norm_reference: 0.04,
            geometry: 0.03,
            text_similarity_weight: 0.1,
            unit_bonus: 0.05,
            score_floor_cap: 0.7,
        }
    }
}

impl LinkerConfig {
    pub fn marker_weight(&self, category: MarkerCategory) -> f64 {
        match category {
            MarkerCategory::ConcreteClass => self.concrete_class,
            MarkerCategory::ExposureClass => self.exposure_class,
            MarkerCategory::SteelGrade => self.steel_grade,
            MarkerCategory::RebarSpacing => self.rebar_spacing,
            MarkerCategory::CoverDepth => self.cover_depth,
            MarkerCategory::SurfaceCategory => self.surface_category,
            MarkerCategory::NormReference => self.norm_reference,
            MarkerCategory::Geometry => self.geometry,
            MarkerCategory::Keyword => 0.0,
        }
    }
}

/// Gate for accepting a position against a catalog code without an exact
/// code hit, used by compliance validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftMatchConfig {
    /// Minimum top-candidate score for a soft match.
    pub min_score: f64,
    /// Maximum number of ranked candidates quoted in advice.
    pub max_advice: usize,
}

impl Default for SoftMatchConfig {
    fn default() -> Self {
        Self {
            min_score: 0.70,
            max_advice: 5,
        }
    }
}

/// The one tuning surface of the matching pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Name reported in run metadata.
    pub name: String,
    /// Candidates below this final score are discarded outright.
    pub fuzzy_floor: f64,
    /// Ranked candidates kept per position.
    pub top_candidates: usize,
    /// Added when position and entry units agree.
    pub unit_bonus: f64,
    /// Cap on the summed marker bonus.
    pub marker_bonus_cap: f64,
    pub marker_weights: MarkerWeights,
    /// Base similarity that alone justifies a partial match.
    pub desc_strong: f64,
    /// Required lead of the top candidate for a marker-evidence match.
    pub marker_gap: f64,
    /// Minimum top score for a marker-evidence match.
    pub marker_top_min: f64,
    /// Minimum base similarity for the fallback description rule.
    pub desc_base_min: f64,
    /// Minimum top score for the fallback description rule.
    pub desc_top_min: f64,
    /// Maximum number of evidence strings per position.
    pub evidence_max_entries: usize,
    /// Maximum length of a single evidence string.
    pub evidence_max_len: usize,
    pub linker: LinkerConfig,
    pub soft_match: SoftMatchConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            fuzzy_floor: 0.45,
            top_candidates: 5,
            unit_bonus: 0.05,
            marker_bonus_cap: 0.35,
            marker_weights: MarkerWeights::default(),
            desc_strong: 0.90,
            marker_gap: 0.15,
            marker_top_min: 0.65,
            desc_base_min: 0.75,
            desc_top_min: 0.80,
            evidence_max_entries: 6,
            evidence_max_len: 160,
            linker: LinkerConfig::default(),
            soft_match: SoftMatchConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Parses a config from TOML; absent keys keep their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_constants() {
        let config = MatchConfig::default();
        assert_eq!(config.fuzzy_floor, 0.45);
        assert_eq!(config.top_candidates, 5);
        assert_eq!(config.marker_bonus_cap, 0.35);
        assert_eq!(config.soft_match.min_score, 0.70);
        assert_eq!(config.linker.accept_min, 0.25);
    }

    #[test]
    fn toml_overrides_subset_only() {
        let config = MatchConfig::from_toml(
            r#"
name = "strict"
fuzzy_floor = 0.5

[soft_match]
min_score = 0.8
"#,
        )
        .unwrap();
        assert_eq!(config.name, "strict");
        assert_eq!(config.fuzzy_floor, 0.5);
        assert_eq!(config.soft_match.min_score, 0.8);
        // untouched keys keep defaults
        assert_eq!(config.desc_strong, 0.90);
        assert_eq!(config.soft_match.max_advice, 5);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(MatchConfig::from_toml("fuzzy_floor = \"high\"").is_err());
    }
}
