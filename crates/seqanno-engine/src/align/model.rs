//! Alignment value types
//!
//! [`AlignmentSegment`] is one contiguous aligned region between an entity
//! sequence and an external reference sequence. Segments are plain values
//! with structural equality; collectors and the grouper pass them around by
//! clone. The per-record reconciliation result is an [`EntityAlignmentMap`]:
//! a sorted map keyed by (entity, provenance), each entry holding the winning
//! segment list per external reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provenance authority for a derived alignment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Alignment embedded in the deposited record
    PrimaryArchive,
    /// Alignment from the external curated chain mapping
    ExternalMapping,
    /// Embedded alignment of a computationally-derived model entry
    ModelInference,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::PrimaryArchive => "primary archive",
            Provenance::ExternalMapping => "external mapping",
            Provenance::ModelInference => "model inference",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one external reference sequence
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ReferenceKey {
    pub database_name: String,
    pub database_accession: String,
    pub database_isoform: Option<String>,
}

/// One contiguous aligned region between an entity and a reference sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentSegment {
    pub database_name: String,
    pub database_accession: String,
    pub database_isoform: Option<String>,

    /// First aligned entity residue
    pub entity_beg: i64,

    /// First aligned reference-sequence residue
    pub database_beg: i64,

    /// Aligned length in residues; non-positive only for inconsistent
    /// upstream data, which the grouper rejects
    pub length: i64,
}

impl AlignmentSegment {
    /// Last aligned entity residue
    pub fn entity_end(&self) -> i64 {
        self.entity_beg + self.length - 1
    }

    /// The external reference this segment aligns against
    pub fn reference_key(&self) -> ReferenceKey {
        ReferenceKey {
            database_name: self.database_name.clone(),
            database_accession: self.database_accession.clone(),
            database_isoform: self.database_isoform.clone(),
        }
    }

    /// True when the two segments cover a common entity residue
    pub fn overlaps_entity(&self, other: &AlignmentSegment) -> bool {
        self.entity_beg <= other.entity_end() && other.entity_beg <= self.entity_end()
    }
}

/// Key of one entity's contribution under one provenance authority
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityProvenanceKey {
    pub entity_id: String,
    pub provenance: Provenance,
}

/// Winning segment lists per external reference, in sorted key order
pub type ReferenceAlignmentMap = BTreeMap<ReferenceKey, Vec<AlignmentSegment>>;

/// Per-record reconciliation result
///
/// At most one winning segment list exists per (entity, provenance,
/// reference) key. Sorted maps keep report emission deterministic.
pub type EntityAlignmentMap = BTreeMap<EntityProvenanceKey, ReferenceAlignmentMap>;

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(entity_beg: i64, length: i64) -> AlignmentSegment {
        AlignmentSegment {
            database_name: "UNP".to_string(),
            database_accession: "P01901".to_string(),
            database_isoform: None,
            entity_beg,
            database_beg: 1,
            length,
        }
    }

    #[test]
    fn test_entity_end() {
        assert_eq!(segment(1, 120).entity_end(), 120);
        assert_eq!(segment(50, 10).entity_end(), 59);
    }

    #[test]
    fn test_overlap_detection() {
        let a = segment(1, 100);
        let b = segment(50, 100);
        let c = segment(101, 50);
        assert!(a.overlaps_entity(&b));
        assert!(b.overlaps_entity(&a));
        assert!(!a.overlaps_entity(&c));
        assert!(b.overlaps_entity(&c));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(segment(1, 100), segment(1, 100));
        assert_ne!(segment(1, 100), segment(2, 100));
    }

    #[test]
    fn test_reference_key_ordering_is_stable() {
        let mut map: ReferenceAlignmentMap = BTreeMap::new();
        map.insert(segment(1, 10).reference_key(), vec![segment(1, 10)]);
        let isoform_key = ReferenceKey {
            database_name: "UNP".to_string(),
            database_accession: "P01901".to_string(),
            database_isoform: Some("2".to_string()),
        };
        map.insert(isoform_key.clone(), vec![segment(1, 5)]);
        let keys: Vec<_> = map.keys().cloned().collect();
        // None sorts before Some, so the isoform-free key comes first.
        assert_eq!(keys[0].database_isoform, None);
        assert_eq!(keys[1], isoform_key);
    }
}
