//! Header-alias resolution.
//!
//! Estimating tools label the same six columns a dozen different ways
//! (`Kód` / `Číslo položky` / `Code`, `MJ` / `Měrná jednotka`, …). The
//! resolver matches labels against an alias table after folding case,
//! diacritics and punctuation, and records what it could not resolve
//! instead of guessing.

use std::collections::BTreeMap;

/// Canonical position fields a header can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Code,
    Description,
    Unit,
    Quantity,
    UnitPrice,
    TotalPrice,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Description => "description",
            Self::Unit => "unit",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::TotalPrice => "total_price",
        }
    }
}

const ALIASES: &[(Field, &[&str])] = &[
    (
        Field::Code,
        &[
            "kod",
            "kod polozky",
            "cislo polozky",
            "polozka",
            "code",
            "item code",
            "otskp",
            "kros kod",
        ],
    ),
    (
        Field::Description,
        &[
            "popis",
            "popis polozky",
            "nazev",
            "nazev polozky",
            "text",
            "description",
            "item description",
        ],
    ),
    (
        Field::Unit,
        &["mj", "merna jednotka", "jednotka", "unit", "uom"],
    ),
    (
        Field::Quantity,
        &["mnozstvi", "vymera", "pocet", "qty", "quantity", "amount"],
    ),
    (
        Field::UnitPrice,
        &[
            "cena jednotkova",
            "jednotkova cena",
            "cena mj",
            "cena za mj",
            "jc",
            "unit price",
            "rate",
        ],
    ),
    (
        Field::TotalPrice,
        &[
            "cena celkem",
            "celkova cena",
            "celkem",
            "naklady celkem",
            "total",
            "total price",
        ],
    ),
];

/// Result of resolving one row's headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    /// Original header label → canonical field.
    pub resolved: BTreeMap<String, Field>,
    /// Labels no alias matched, kept for diagnostics.
    pub unknown: Vec<String>,
}

impl HeaderMap {
    pub fn field_for(&self, header: &str) -> Option<Field> {
        self.resolved.get(header).copied()
    }

    /// Share of headers that resolved; used as format-detection
    /// confidence in normalization statistics.
    pub fn confidence(&self) -> f64 {
        let total = self.resolved.len() + self.unknown.len();
        if total == 0 {
            0.0
        } else {
            self.resolved.len() as f64 / total as f64
        }
    }
}

/// Resolves header labels case/diacritic/punctuation-insensitively.
///
/// The first header claiming a field wins; a second label aliasing the
/// same field stays unresolved rather than silently overwriting.
pub fn resolve_headers<'a, I>(headers: I) -> HeaderMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut map = HeaderMap::default();
    let mut claimed: BTreeMap<Field, ()> = BTreeMap::new();

    for header in headers {
        let folded = fold_header(header);
        // "M.J." folds to "m j"; compare the compacted form as well
        let compact: String = folded.split_whitespace().collect();
        let field = ALIASES.iter().find_map(|(field, aliases)| {
            (aliases.contains(&folded.as_str()) || aliases.contains(&compact.as_str()))
                .then_some(*field)
        });
        match field {
            Some(field) if !claimed.contains_key(&field) => {
                claimed.insert(field, ());
                map.resolved.insert(header.to_string(), field);
            }
            _ => map.unknown.push(header.to_string()),
        }
    }

    map
}

fn fold_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        let folded = match ch {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'č' | 'ç' => 'c',
            'ď' => 'd',
            'é' | 'ě' | 'è' | 'ë' => 'e',
            'í' | 'î' | 'ï' => 'i',
            'ň' => 'n',
            'ó' | 'ô' | 'ö' => 'o',
            'ř' => 'r',
            'š' => 's',
            'ť' => 't',
            'ú' | 'ů' | 'ü' => 'u',
            'ý' => 'y',
            'ž' => 'z',
            _ if ch.is_ascii_alphanumeric() => ch,
            _ => ' ',
        };
        out.push(folded);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_czech_labels_with_diacritics() {
        let map = resolve_headers(["Kód", "Popis položky", "M.J.", "Množství"]);
        assert_eq!(map.field_for("Kód"), Some(Field::Code));
        assert_eq!(map.field_for("Popis položky"), Some(Field::Description));
        assert_eq!(map.field_for("M.J."), Some(Field::Unit));
        assert_eq!(map.field_for("Množství"), Some(Field::Quantity));
        assert!(map.unknown.is_empty());
        assert_eq!(map.confidence(), 1.0);
    }

    #[test]
    fn unknown_headers_are_recorded_not_matched() {
        let map = resolve_headers(["Kód", "Poznámka"]);
        assert_eq!(map.unknown, vec!["Poznámka".to_string()]);
        assert!(map.confidence() < 1.0);
    }

    #[test]
    fn second_alias_for_same_field_stays_unresolved() {
        let map = resolve_headers(["Popis", "Název"]);
        assert_eq!(map.field_for("Popis"), Some(Field::Description));
        assert_eq!(map.field_for("Název"), None);
        assert_eq!(map.unknown, vec!["Název".to_string()]);
    }
}
