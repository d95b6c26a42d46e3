//! Marker extraction: turns free text into a typed token bundle.
//!
//! A bundle holds the normalized text, a lexical token set and one set of
//! detected markers per category (concrete class, exposure class, steel
//! grade, …). Extraction is a pure function over `(text, unit)` with no
//! shared state, safe to call concurrently.
//!
//! Marker detectors are a data-driven `{category, pattern}` table; their
//! scoring weights live in [`crate::config::MarkerWeights`] so new
//! categories can be added without touching scoring logic.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

/// Marker categories recognized in BOQ descriptions and drawing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerCategory {
    /// Concrete strength class, e.g. `C25/30`, `LC30/33`.
    ConcreteClass,
    /// Environmental exposure class, e.g. `XC2`, `XF4`, `X0`.
    ExposureClass,
    /// Reinforcement steel grade, e.g. `B500B`, `10 505`.
    SteelGrade,
    /// Rebar spacing, e.g. `á 150 mm`.
    RebarSpacing,
    /// Concrete cover depth, e.g. `krytí 30 mm`.
    CoverDepth,
    /// Surface/finish category, e.g. architectural concrete grades.
    SurfaceCategory,
    /// Normative reference, e.g. `ČSN EN 206`, `TKP 18`.
    NormReference,
    /// Geometry token, e.g. `tl 200 mm`, `DN 300`, `d 12`.
    Geometry,
    /// Closed vocabulary of structural domain keywords.
    Keyword,
}

impl MarkerCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConcreteClass => "concrete_class",
            Self::ExposureClass => "exposure_class",
            Self::SteelGrade => "steel_grade",
            Self::RebarSpacing => "rebar_spacing",
            Self::CoverDepth => "cover_depth",
            Self::SurfaceCategory => "surface_category",
            Self::NormReference => "norm_reference",
            Self::Geometry => "geometry",
            Self::Keyword => "keyword",
        }
    }
}

struct MarkerDef {
    category: MarkerCategory,
    pattern: &'static LazyLock<Regex>,
}

macro_rules! marker_regex {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("marker regex"));
    };
}

marker_regex!(RE_CONCRETE, r"\b(?:lc|c)\s?\d{1,2}/\d{1,3}\b");
marker_regex!(RE_EXPOSURE, r"\bx(?:0|[cdfsam]\d)\b");
marker_regex!(RE_STEEL, r"\bb\s?500\s?[abc]?\b|\b10\s?505\b");
marker_regex!(RE_REBAR, r"\b[a@]\s?\d{2,3}\s?mm\b");
marker_regex!(RE_COVER, r"\b(?:kryti|cover)\s?\d{2,3}\s?mm\b");
marker_regex!(RE_SURFACE, r"\bpohledov\w*\b|\bpb[1-5]\b");
marker_regex!(RE_NORM, r"\b(?:csn|din|iso|tkp|tp)\s?(?:en\s?)?\d{1,6}\b|\ben\s?\d{3,6}\b");
marker_regex!(RE_GEOMETRY, r"\b(?:dn|tl)\.?\s?\d{1,4}\b|\bd\s?\d{1,2}\b");
marker_regex!(RE_UNIT, r"\b(?:m[123]|mm|cm|kg|t|kus|ks|kpl|sada|soubor|hod|bm|km|ha|l)\b");

/// Closed vocabulary of structural keywords, matched by token prefix so
/// inflected forms (`betonu`, `betonove`) hit the stem.
const DOMAIN_KEYWORDS: &[&str] = &[
    "asfalt",
    "bedneni",
    "beton",
    "dlazba",
    "drenaz",
    "injektaz",
    "izolac",
    "kotv",
    "mostovk",
    "nasyp",
    "omitk",
    "ornic",
    "pilot",
    "rims",
    "svodidl",
    "vykop",
    "vyztuz",
    "zabradl",
    "zdivo",
    "zelezobeton",
];

fn marker_table() -> [MarkerDef; 8] {
    [
        MarkerDef {
            category: MarkerCategory::ConcreteClass,
            pattern: &RE_CONCRETE,
        },
        MarkerDef {
            category: MarkerCategory::ExposureClass,
            pattern: &RE_EXPOSURE,
        },
        MarkerDef {
            category: MarkerCategory::SteelGrade,
            pattern: &RE_STEEL,
        },
        MarkerDef {
            category: MarkerCategory::RebarSpacing,
            pattern: &RE_REBAR,
        },
        MarkerDef {
            category: MarkerCategory::CoverDepth,
            pattern: &RE_COVER,
        },
        MarkerDef {
            category: MarkerCategory::SurfaceCategory,
            pattern: &RE_SURFACE,
        },
        MarkerDef {
            category: MarkerCategory::NormReference,
            pattern: &RE_NORM,
        },
        MarkerDef {
            category: MarkerCategory::Geometry,
            pattern: &RE_GEOMETRY,
        },
    ]
}

/// Normalized lexical + marker representation of a text snippet.
///
/// Recomputed per snippet, never persisted.
#[derive(Debug, Clone, Default)]
pub struct TokenBundle {
    /// Lowercase, diacritic-stripped text with collapsed whitespace.
    pub normalized: String,
    /// Alphanumeric runs of length ≥ 3.
    pub tokens: BTreeSet<String>,
    /// Detected markers per category; whitespace inside a marker is
    /// compacted (`c 25/30` → `c25/30`).
    pub markers: BTreeMap<MarkerCategory, BTreeSet<String>>,
    /// Measurement-unit tokens seen in the text plus the explicit unit.
    pub units: BTreeSet<String>,
}

impl TokenBundle {
    pub fn markers_for(&self, category: MarkerCategory) -> Option<&BTreeSet<String>> {
        self.markers.get(&category)
    }

    pub fn has_markers(&self) -> bool {
        self.markers.values().any(|set| !set.is_empty())
    }
}

/// Builds a token bundle from a text snippet and an optional unit.
pub fn extract_bundle(text: &str, unit: Option<&str>) -> TokenBundle {
    let normalized = normalize_text(text);

    let mut tokens = BTreeSet::new();
    for run in normalized.split(|ch: char| !ch.is_ascii_alphanumeric()) {
        if run.len() >= 3 {
            tokens.insert(run.to_string());
        }
    }

    let mut markers: BTreeMap<MarkerCategory, BTreeSet<String>> = BTreeMap::new();
    for def in marker_table() {
        for found in def.pattern.find_iter(&normalized) {
            let compact: String = found
                .as_str()
                .chars()
                .filter(|ch| !ch.is_whitespace() && *ch != '.')
                .collect();
            markers.entry(def.category).or_default().insert(compact);
        }
    }
    for token in &tokens {
        for keyword in DOMAIN_KEYWORDS {
            if token.starts_with(keyword) {
                markers
                    .entry(MarkerCategory::Keyword)
                    .or_default()
                    .insert((*keyword).to_string());
            }
        }
    }

    let mut units = BTreeSet::new();
    for found in RE_UNIT.find_iter(&normalized) {
        units.insert(found.as_str().to_string());
    }
    if let Some(unit) = unit {
        let normalized_unit = normalize_unit(unit);
        if !normalized_unit.is_empty() {
            units.insert(normalized_unit);
        }
    }

    TokenBundle {
        normalized,
        tokens,
        markers,
        units,
    }
}

/// Lowercases, strips diacritics and collapses whitespace/punctuation
/// noise while keeping marker-significant characters (`/`, `.`, `-`, `@`).
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        match fold_char(ch) {
            Some(folded) => out.push(folded),
            None => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalizes a measurement unit: diacritics stripped, superscripts
/// flattened, common synonyms collapsed.
pub fn normalize_unit(raw: &str) -> String {
    let folded = normalize_text(raw).replace([' ', '.'], "");
    match folded.as_str() {
        "ks" | "kus" | "kusy" | "kusu" => "kus".to_string(),
        "sada" | "soubor" | "kpl" | "komplet" => "kpl".to_string(),
        "hod" | "h" => "hod".to_string(),
        "bm" => "m".to_string(),
        other => other.to_string(),
    }
}

fn fold_char(ch: char) -> Option<char> {
    let folded = match ch {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'č' | 'ç' => 'c',
        'ď' => 'd',
        'é' | 'ě' | 'è' | 'ë' => 'e',
        'í' | 'î' | 'ï' => 'i',
        'ľ' | 'ĺ' => 'l',
        'ň' => 'n',
        'ó' | 'ô' | 'ö' => 'o',
        'ř' | 'ŕ' => 'r',
        'š' => 's',
        'ť' => 't',
        'ú' | 'ů' | 'ü' => 'u',
        'ý' => 'y',
        'ž' => 'z',
        '²' => '2',
        '³' => '3',
        'ø' | '⌀' => 'd',
        '/' | '.' | '-' | '@' => ch,
        _ if ch.is_ascii_alphanumeric() => ch,
        _ => return None,
    };
    Some(folded)
}
