//! Alignment source reconciliation and row emission
//!
//! [`AlignmentResolver`] starts from the embedded collector's output and,
//! when external reconciliation is enabled, replaces an entity's embedded
//! entries wholesale as soon as the external mapping knows anything about
//! that entity. The override is deliberately whole-entity: mixing a curated
//! accession with a leftover embedded one would attach two different
//! numbering schemes to a single entity, so an entity with any external
//! mapping loses all embedded accessions, even unrelated ones.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::record::EntryRecord;

use super::embedded::collect_embedded_alignments;
use super::external::{collect_external_alignments, ChainAlignmentSource};
use super::model::{EntityAlignmentMap, Provenance};

/// Display names of supported reference databases.
///
/// Alignments naming a database outside this list are skipped with a
/// warning; several deposited synonyms collapse onto one display name.
pub fn display_database_name(database_name: &str) -> Option<&'static str> {
    match database_name {
        "UNP" | "TREMBL" | "SWS" => Some("UniProt"),
        "GB" | "GENP" | "TPG" => Some("GenBank"),
        "EMBL" => Some("EMBL"),
        "NDB" => Some("NDB"),
        "NOR" => Some("NORINE"),
        "PIR" => Some("PIR"),
        "PRF" => Some("PRF"),
        "REF" => Some("RefSeq"),
        "PDB" => Some("PDB"),
        _ => None,
    }
}

/// One emitted alignment row
///
/// The three region lists are parallel, in stable segment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub entry_id: String,
    pub entity_id: String,
    pub reference_database: String,
    pub accession: String,
    #[serde(default)]
    pub isoform: Option<String>,
    pub provenance: Provenance,
    pub ref_beg: Vec<i64>,
    pub entity_beg: Vec<i64>,
    pub lengths: Vec<i64>,
}

/// Reconciles the two alignment sources for one record at a time.
pub struct AlignmentResolver<'a> {
    use_external: bool,
    external: Option<&'a dyn ChainAlignmentSource>,
}

impl<'a> AlignmentResolver<'a> {
    /// External reconciliation runs only when enabled and a source is wired.
    pub fn new(use_external: bool, external: Option<&'a dyn ChainAlignmentSource>) -> Self {
        Self {
            use_external: use_external && external.is_some(),
            external,
        }
    }

    /// Produce the canonical per-entity alignment map for a record.
    pub fn resolve(&self, record: &EntryRecord) -> EntityAlignmentMap {
        let embedded = collect_embedded_alignments(record);

        let external = match (self.use_external, self.external) {
            (true, Some(source)) => collect_external_alignments(record, source),
            _ => EntityAlignmentMap::new(),
        };
        if external.is_empty() {
            return embedded;
        }

        // Whole-entity override: rebuild rather than mutate in place. Any
        // entity the external mapping knows loses every embedded entry.
        let overridden: BTreeSet<&String> =
            external.keys().map(|key| &key.entity_id).collect();
        let mut merged: EntityAlignmentMap = BTreeMap::new();
        for (key, references) in &embedded {
            if overridden.contains(&key.entity_id) {
                debug!(
                    "{} entity {}: embedded alignments overridden by external mapping",
                    record.entry_id, key.entity_id
                );
                continue;
            }
            merged.insert(key.clone(), references.clone());
        }
        merged.extend(external);
        merged
    }

    /// Flatten a resolved map into emitted rows.
    ///
    /// Rows come out in sorted key order; unsupported reference databases
    /// are dropped per row, never failing the record.
    pub fn build_rows(&self, record: &EntryRecord) -> Vec<AlignmentRow> {
        let resolved = self.resolve(record);
        let mut rows = Vec::new();
        for (entity_key, references) in &resolved {
            for (reference, segments) in references {
                let Some(display_name) = display_database_name(&reference.database_name) else {
                    warn!(
                        "Skipping unsupported reference database {:?} for entry {} entity {}",
                        reference.database_name, record.entry_id, entity_key.entity_id
                    );
                    continue;
                };
                rows.push(AlignmentRow {
                    entry_id: record.entry_id.clone(),
                    entity_id: entity_key.entity_id.clone(),
                    reference_database: display_name.to_string(),
                    accession: reference.database_accession.clone(),
                    isoform: reference.database_isoform.clone(),
                    provenance: entity_key.provenance,
                    ref_beg: segments.iter().map(|s| s.database_beg).collect(),
                    entity_beg: segments.iter().map(|s| s.entity_beg).collect(),
                    lengths: segments.iter().map(|s| s.length).collect(),
                });
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::model::AlignmentSegment;
    use crate::record::{ChainDescription, EntityDescription, EntityType, ReferenceAlignmentRow};
    use std::collections::HashMap;

    struct FixtureSource {
        chains: HashMap<String, Vec<AlignmentSegment>>,
    }

    impl ChainAlignmentSource for FixtureSource {
        fn alignments(&self, _entry_id: &str, auth_asym_id: &str) -> Vec<AlignmentSegment> {
            self.chains.get(auth_asym_id).cloned().unwrap_or_default()
        }
    }

    fn embedded_row(
        entity_id: &str,
        db: &str,
        accession: &str,
        beg: i64,
        end: i64,
    ) -> ReferenceAlignmentRow {
        ReferenceAlignmentRow {
            entity_id: entity_id.to_string(),
            database_name: db.to_string(),
            database_accession: accession.to_string(),
            database_isoform: None,
            entity_beg: beg,
            entity_end: end,
            database_beg: beg,
        }
    }

    fn mapped(accession: &str, length: i64) -> AlignmentSegment {
        AlignmentSegment {
            database_name: "UNP".to_string(),
            database_accession: accession.to_string(),
            database_isoform: None,
            entity_beg: 1,
            database_beg: 22,
            length,
        }
    }

    fn record(rows: Vec<ReferenceAlignmentRow>) -> EntryRecord {
        EntryRecord {
            entry_id: "1BQH".to_string(),
            computational_model: false,
            entities: vec![EntityDescription {
                id: "1".to_string(),
                entity_type: EntityType::Polymer,
            }],
            chains: vec![ChainDescription {
                asym_id: "a".to_string(),
                auth_asym_id: "A".to_string(),
                entity_id: "1".to_string(),
            }],
            reference_alignments: rows,
            engineered_sources: Vec::new(),
            natural_sources: Vec::new(),
            synthetic_sources: Vec::new(),
        }
    }

    #[test]
    fn test_external_overrides_whole_entity() {
        // Embedded carries an unrelated EMBL accession besides the UniProt
        // one; any external result wipes both.
        let record = record(vec![
            embedded_row("1", "UNP", "P01901", 1, 120),
            embedded_row("1", "EMBL", "CAB4134", 1, 80),
        ]);
        let source = FixtureSource {
            chains: HashMap::from([("A".to_string(), vec![mapped("P01901", 140)])]),
        };
        let resolver = AlignmentResolver::new(true, Some(&source));

        let rows = resolver.build_rows(&record);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].provenance, Provenance::ExternalMapping);
        assert_eq!(rows[0].accession, "P01901");
        assert_eq!(rows[0].lengths, vec![140]);
    }

    #[test]
    fn test_entity_without_external_keeps_embedded() {
        let record = record(vec![
            embedded_row("1", "UNP", "P01901", 1, 120),
            embedded_row("1", "EMBL", "CAB4134", 1, 80),
        ]);
        let source = FixtureSource {
            chains: HashMap::new(),
        };
        let resolver = AlignmentResolver::new(true, Some(&source));

        let rows = resolver.build_rows(&record);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.provenance == Provenance::PrimaryArchive));
        let accessions: Vec<_> = rows.iter().map(|r| r.accession.as_str()).collect();
        assert!(accessions.contains(&"P01901"));
        assert!(accessions.contains(&"CAB4134"));
    }

    #[test]
    fn test_disabled_option_ignores_external() {
        let record = record(vec![embedded_row("1", "UNP", "P01901", 1, 120)]);
        let source = FixtureSource {
            chains: HashMap::from([("A".to_string(), vec![mapped("P01901", 140)])]),
        };
        let resolver = AlignmentResolver::new(false, Some(&source));

        let rows = resolver.build_rows(&record);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].provenance, Provenance::PrimaryArchive);
        assert_eq!(rows[0].lengths, vec![120]);
    }

    #[test]
    fn test_unsupported_database_skipped() {
        let record = record(vec![
            embedded_row("1", "UNP", "P01901", 1, 120),
            embedded_row("1", "PDB-DEV", "X999", 1, 50),
        ]);
        let resolver = AlignmentResolver::new(false, None);

        let rows = resolver.build_rows(&record);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reference_database, "UniProt");
    }

    #[test]
    fn test_database_display_names() {
        assert_eq!(display_database_name("UNP"), Some("UniProt"));
        assert_eq!(display_database_name("TREMBL"), Some("UniProt"));
        assert_eq!(display_database_name("GB"), Some("GenBank"));
        assert_eq!(display_database_name("REF"), Some("RefSeq"));
        assert_eq!(display_database_name("PDB-DEV"), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let record = record(vec![
            embedded_row("1", "UNP", "P01901", 1, 120),
            embedded_row("1", "UNP", "P01901", 1, 45),
        ]);
        let source = FixtureSource {
            chains: HashMap::from([("A".to_string(), vec![mapped("P01901", 140)])]),
        };
        let resolver = AlignmentResolver::new(true, Some(&source));

        let first = resolver.build_rows(&record);
        let second = resolver.build_rows(&record);
        assert_eq!(first, second);
    }
}
