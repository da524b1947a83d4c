//! External chain-mapping collector
//!
//! The external curated resource maps physical chains, not entities, to
//! reference sequences. A single entity may own several chains whose
//! alignments disagree in numbering or extent, so the collector retains, per
//! entity, only the one chain whose total aligned length is greatest and
//! never mixes segments from two chains into one alignment.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::record::EntryRecord;

use super::grouper::select_covering_group;
use super::model::{
    AlignmentSegment, EntityAlignmentMap, EntityProvenanceKey, Provenance, ReferenceKey,
};

/// Read-only source of curated per-chain alignments.
pub trait ChainAlignmentSource {
    /// Alignment segments for one chain of one entry, in resource order.
    /// Chains unknown to the resource yield an empty list.
    fn alignments(&self, entry_id: &str, auth_asym_id: &str) -> Vec<AlignmentSegment>;
}

/// Collect curated alignments, one best chain per entity.
///
/// Only polymer and branched entities are consulted. On equal total aligned
/// length the first-encountered chain is kept.
pub fn collect_external_alignments(
    record: &EntryRecord,
    source: &dyn ChainAlignmentSource,
) -> EntityAlignmentMap {
    let mut best_segments: HashMap<String, Vec<AlignmentSegment>> = HashMap::new();
    let mut best_length: HashMap<String, i64> = HashMap::new();

    for chain in &record.chains {
        let alignable = record
            .entity_type(&chain.entity_id)
            .is_some_and(|t| t.is_alignable());
        if !alignable {
            continue;
        }
        let segments = source.alignments(&record.entry_id, &chain.auth_asym_id);
        let total: i64 = segments.iter().map(|s| s.length).sum();
        debug!(
            "{} chain {} entity {}: {} mapped residues",
            record.entry_id, chain.auth_asym_id, chain.entity_id, total
        );
        // Keep only the longest-covering chain per entity; a later chain
        // must be strictly longer to displace an earlier one.
        if total > best_length.get(&chain.entity_id).copied().unwrap_or(0) {
            best_length.insert(chain.entity_id.clone(), total);
            best_segments.insert(chain.entity_id.clone(), segments);
        }
    }

    let mut out: EntityAlignmentMap = BTreeMap::new();
    for (entity_id, segments) in best_segments {
        let mut by_reference: BTreeMap<ReferenceKey, Vec<AlignmentSegment>> = BTreeMap::new();
        for segment in segments {
            by_reference
                .entry(segment.reference_key())
                .or_default()
                .push(segment);
        }
        for (key, segments) in by_reference {
            let context = format!(
                "{} entity {} {}:{}",
                record.entry_id, entity_id, key.database_name, key.database_accession
            );
            if let Some(winner) = select_covering_group(&context, &segments) {
                out.entry(EntityProvenanceKey {
                    entity_id: entity_id.clone(),
                    provenance: Provenance::ExternalMapping,
                })
                .or_default()
                .insert(key, winner);
            }
        }
    }
    out
}
