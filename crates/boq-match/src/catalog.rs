//! Build-once, read-many catalog index.
//!
//! The catalog provider hands over flat records; `CatalogIndex::build`
//! turns them into an immutable value with code, alias/bridge and
//! section-prefix lookup maps plus a pre-computed token bundle per entry.
//! The index is injected into the pipeline and shared by reference across
//! worker threads — it never mutates after construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::Digest;
use tracing::warn;

use boq_model::{AuditError, SectionIndex, SectionInfo};

use crate::markers::{TokenBundle, extract_bundle, normalize_unit};

/// Flat catalog record as supplied by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub code: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Codes from bridge/translation tables of other classification
    /// systems mapping onto this entry.
    #[serde(default)]
    pub bridge_codes: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Classification system the code belongs to (e.g. OTSKP, KROS).
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub tech_spec: Option<String>,
}

/// Section record as supplied by the provider's section index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

/// One catalog entry with its pre-computed token bundle.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub code: String,
    pub normalized_code: String,
    pub aliases: Vec<String>,
    pub bridge_codes: Vec<String>,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub normalized_unit: Option<String>,
    pub system: Option<String>,
    pub tech_spec: Option<String>,
    pub bundle: TokenBundle,
}

impl CatalogEntry {
    /// Entries that carry a unit price work against them; only these
    /// participate in compliance lookups.
    pub fn is_cost_bearing(&self) -> bool {
        self.unit.is_some()
    }
}

/// Immutable catalog lookup structure for one audit run.
#[derive(Debug)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    by_code: BTreeMap<String, usize>,
    by_alias: BTreeMap<String, usize>,
    sections: SectionIndex,
    fingerprint: String,
}

/// Uppercases and trims a code for index lookup.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Removes separator characters so `121-101.1` and `121101.1` collide.
pub fn compact_code(raw: &str) -> String {
    normalize_code(raw)
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect()
}

impl CatalogIndex {
    /// Builds the index from provider records.
    ///
    /// An empty catalog is a fatal setup failure: the run must abort
    /// before any position is processed rather than emit output that was
    /// never checked against anything.
    pub fn build(
        records: Vec<CatalogRecord>,
        sections: SectionIndex,
    ) -> Result<Self, AuditError> {
        if records.is_empty() {
            return Err(AuditError::CatalogUnavailable(
                "catalog provider returned no entries".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(records.len());
        let mut by_code = BTreeMap::new();
        let mut by_alias = BTreeMap::new();

        for record in records {
            let normalized_code = normalize_code(&record.code);
            if normalized_code.is_empty() {
                warn!(name = %record.name, "catalog record without code skipped");
                continue;
            }
            let text = match (&record.description, &record.tech_spec) {
                (Some(description), Some(tech)) => {
                    format!("{} {description} {tech}", record.name)
                }
                (Some(description), None) => format!("{} {description}", record.name),
                (None, Some(tech)) => format!("{} {tech}", record.name),
                (None, None) => record.name.clone(),
            };
            let bundle = extract_bundle(&text, record.unit.as_deref());
            let entry = CatalogEntry {
                normalized_code: normalized_code.clone(),
                normalized_unit: record.unit.as_deref().map(normalize_unit),
                code: record.code,
                aliases: record.aliases,
                bridge_codes: record.bridge_codes,
                name: record.name,
                description: record.description,
                unit: record.unit,
                system: record.system,
                tech_spec: record.tech_spec,
                bundle,
            };

            let idx = entries.len();
            for key in [normalized_code.clone(), compact_code(&entry.code)] {
                if let Some(existing) = by_code.insert(key.clone(), idx) {
                    if existing != idx {
                        // first occurrence wins
                        by_code.insert(key, existing);
                        warn!(code = %entry.code, "duplicate catalog code, first entry kept");
                    }
                }
            }
            for alias in entry.aliases.iter().chain(entry.bridge_codes.iter()) {
                for key in [normalize_code(alias), compact_code(alias)] {
                    if key.is_empty() {
                        continue;
                    }
                    by_alias.entry(key).or_insert(idx);
                }
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(AuditError::CatalogUnavailable(
                "no catalog record carried a usable code".to_string(),
            ));
        }

        let fingerprint = fingerprint_codes(&entries);

        Ok(Self {
            entries,
            by_code,
            by_alias,
            sections,
            fingerprint,
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// sha256 over the sorted code list; stamped into run metadata so a
    /// report names the exact catalog it was audited against.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn sections(&self) -> &SectionIndex {
        &self.sections
    }

    /// Raw/normalized/compacted lookup in the code index.
    pub fn exact(&self, code: &str) -> Option<&CatalogEntry> {
        self.by_code
            .get(code)
            .or_else(|| self.by_code.get(&normalize_code(code)))
            .or_else(|| self.by_code.get(&compact_code(code)))
            .map(|idx| &self.entries[*idx])
    }

    /// Normalized lookup in the alias/bridge index.
    pub fn alias(&self, code: &str) -> Option<&CatalogEntry> {
        self.by_alias
            .get(&normalize_code(code))
            .or_else(|| self.by_alias.get(&compact_code(code)))
            .map(|idx| &self.entries[*idx])
    }

    /// Section lookup by the code's numeric prefix: 3 digits first,
    /// falling back to 1. Absence is not an error.
    pub fn section_for_code(&self, code: &str) -> Option<&SectionInfo> {
        section_lookup(&self.sections, code)
    }
}

/// Standalone prefix lookup over a section index.
pub fn section_lookup<'a>(sections: &'a SectionIndex, code: &str) -> Option<&'a SectionInfo> {
    let digits: String = code.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    if digits.len() >= 3
        && let Some(info) = sections.get(&digits[..3])
    {
        return Some(info);
    }
    if !digits.is_empty() {
        return sections.get(&digits[..1]);
    }
    None
}

/// Converts provider section records into the prefix index.
pub fn build_section_index(records: Vec<SectionRecord>) -> SectionIndex {
    records
        .into_iter()
        .map(|record| {
            let prefix: String = record
                .code
                .chars()
                .take_while(|ch| ch.is_ascii_digit())
                .collect();
            (
                prefix,
                SectionInfo {
                    code: record.code,
                    name: record.name,
                    kind: record.kind,
                },
            )
        })
        .collect()
}

fn fingerprint_codes(entries: &[CatalogEntry]) -> String {
    let mut codes: Vec<&str> = entries.iter().map(|e| e.normalized_code.as_str()).collect();
    codes.sort_unstable();
    let joined = codes.join("\n");
    let digest = sha2::Sha256::digest(joined.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, name: &str, unit: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            code: code.to_string(),
            aliases: Vec::new(),
            bridge_codes: Vec::new(),
            name: name.to_string(),
            description: None,
            unit: unit.map(String::from),
            system: None,
            tech_spec: None,
        }
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let err = CatalogIndex::build(Vec::new(), SectionIndex::new()).unwrap_err();
        assert!(matches!(err, AuditError::CatalogUnavailable(_)));
    }

    #[test]
    fn exact_lookup_accepts_raw_normalized_and_compacted() {
        let index = CatalogIndex::build(
            vec![record("121101", "Sejmutí ornice", Some("m3"))],
            SectionIndex::new(),
        )
        .unwrap();
        assert!(index.exact("121101").is_some());
        assert!(index.exact(" 121101 ").is_some());
        assert!(index.exact("121-101").is_some());
        assert!(index.exact("999999").is_none());
    }

    #[test]
    fn alias_and_bridge_codes_resolve() {
        let mut rec = record("272325", "Beton základů", Some("m3"));
        rec.aliases.push("272-325".to_string());
        rec.bridge_codes.push("C272.325".to_string());
        let index = CatalogIndex::build(vec![rec], SectionIndex::new()).unwrap();
        assert!(index.alias("272-325").is_some());
        assert!(index.alias("c272.325").is_some());
    }

    #[test]
    fn duplicate_codes_keep_first_entry() {
        let index = CatalogIndex::build(
            vec![
                record("121101", "First", Some("m3")),
                record("121101", "Second", Some("m2")),
            ],
            SectionIndex::new(),
        )
        .unwrap();
        assert_eq!(index.exact("121101").unwrap().name, "First");
    }

    #[test]
    fn section_prefix_falls_back_to_one_digit() {
        let sections = build_section_index(vec![
            SectionRecord {
                code: "121".to_string(),
                name: "Earthworks, topsoil".to_string(),
                kind: Some("division".to_string()),
            },
            SectionRecord {
                code: "2".to_string(),
                name: "Foundations".to_string(),
                kind: None,
            },
        ]);
        let index = CatalogIndex::build(
            vec![record("121101", "Sejmutí ornice", Some("m3"))],
            sections,
        )
        .unwrap();
        assert_eq!(index.section_for_code("121101").unwrap().code, "121");
        assert_eq!(index.section_for_code("272325").unwrap().code, "2");
        assert!(index.section_for_code("999999").is_none());
    }

    #[test]
    fn fingerprint_is_stable_across_record_order() {
        let a = CatalogIndex::build(
            vec![
                record("121101", "A", None),
                record("272325", "B", Some("m3")),
            ],
            SectionIndex::new(),
        )
        .unwrap();
        let b = CatalogIndex::build(
            vec![
                record("272325", "B", Some("m3")),
                record("121101", "A", None),
            ],
            SectionIndex::new(),
        )
        .unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
