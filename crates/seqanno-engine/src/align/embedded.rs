//! Embedded alignment collector
//!
//! Gathers the reference-sequence alignments carried directly in the
//! deposited record, one winning segment list per (entity, reference) pair.
//! Entities with no embedded alignments are simply absent from the output.

use std::collections::BTreeMap;

use crate::record::EntryRecord;

use super::grouper::select_covering_group;
use super::model::{
    AlignmentSegment, EntityAlignmentMap, EntityProvenanceKey, Provenance, ReferenceKey,
};

/// Collect the record's embedded alignments per entity.
///
/// Provenance is the primary archive, relabeled to model inference for
/// computationally-derived entries.
pub fn collect_embedded_alignments(record: &EntryRecord) -> EntityAlignmentMap {
    let provenance = if record.computational_model {
        Provenance::ModelInference
    } else {
        Provenance::PrimaryArchive
    };

    // One pass: bucket raw segments by entity, then by reference key,
    // preserving deposition order inside each bucket.
    let mut by_entity: BTreeMap<String, BTreeMap<ReferenceKey, Vec<AlignmentSegment>>> =
        BTreeMap::new();
    for row in &record.reference_alignments {
        let segment = row.segment();
        by_entity
            .entry(row.entity_id.clone())
            .or_default()
            .entry(segment.reference_key())
            .or_default()
            .push(segment);
    }

    let mut out: EntityAlignmentMap = BTreeMap::new();
    for (entity_id, references) in by_entity {
        for (key, segments) in references {
            let context = format!(
                "{} entity {} {}:{}",
                record.entry_id, entity_id, key.database_name, key.database_accession
            );
            if let Some(winner) = select_covering_group(&context, &segments) {
                out.entry(EntityProvenanceKey {
                    entity_id: entity_id.clone(),
                    provenance,
                })
                .or_default()
                .insert(key, winner);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ReferenceAlignmentRow;

    fn row(entity_id: &str, accession: &str, beg: i64, end: i64) -> ReferenceAlignmentRow {
        ReferenceAlignmentRow {
            entity_id: entity_id.to_string(),
            database_name: "UNP".to_string(),
            database_accession: accession.to_string(),
            database_isoform: None,
            entity_beg: beg,
            entity_end: end,
            database_beg: beg,
        }
    }

    fn record(rows: Vec<ReferenceAlignmentRow>, computational: bool) -> EntryRecord {
        EntryRecord {
            entry_id: "1ABC".to_string(),
            computational_model: computational,
            entities: Vec::new(),
            chains: Vec::new(),
            reference_alignments: rows,
            engineered_sources: Vec::new(),
            natural_sources: Vec::new(),
            synthetic_sources: Vec::new(),
        }
    }

    #[test]
    fn test_collects_winner_per_reference() {
        let record = record(
            vec![
                row("1", "P01901", 1, 120),
                row("1", "P01901", 1, 45),
                row("2", "P01887", 1, 99),
            ],
            false,
        );
        let collected = collect_embedded_alignments(&record);
        assert_eq!(collected.len(), 2);

        let entity1 = collected
            .get(&EntityProvenanceKey {
                entity_id: "1".to_string(),
                provenance: Provenance::PrimaryArchive,
            })
            .unwrap();
        let segments = entity1.values().next().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].length, 120);
    }

    #[test]
    fn test_model_record_relabels_provenance() {
        let record = record(vec![row("1", "P01901", 1, 120)], true);
        let collected = collect_embedded_alignments(&record);
        assert!(collected.contains_key(&EntityProvenanceKey {
            entity_id: "1".to_string(),
            provenance: Provenance::ModelInference,
        }));
    }

    #[test]
    fn test_entity_without_alignments_is_absent() {
        let collected = collect_embedded_alignments(&record(Vec::new(), false));
        assert!(collected.is_empty());
    }

    #[test]
    fn test_inconsistent_entity_is_dropped_not_fatal() {
        let record = record(
            vec![row("1", "P01901", 120, 1), row("2", "P01887", 1, 99)],
            false,
        );
        let collected = collect_embedded_alignments(&record);
        assert_eq!(collected.len(), 1);
        assert!(collected.keys().all(|k| k.entity_id == "2"));
    }
}
