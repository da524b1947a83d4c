//! Entry record input model
//!
//! One [`EntryRecord`] is the deposited content of a single archive entry,
//! reduced to the categories the annotation engine consumes: the entity
//! table, the chain (instance) table, the embedded reference-sequence
//! alignments, and the three source-organism categories. Records are read
//! from JSON documents; every section except `entry_id` is optional so that
//! sparse depositions deserialize cleanly.

use serde::{Deserialize, Serialize};

use seqanno_common::text::strip_whitespace;

use crate::align::model::AlignmentSegment;

/// Molecular species kind of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Polymer,
    Branched,
    NonPolymer,
    Water,
}

impl EntityType {
    /// Entity kinds that carry reference-sequence alignments
    pub fn is_alignable(self) -> bool {
        matches!(self, EntityType::Polymer | EntityType::Branched)
    }
}

/// One distinct molecular species within the entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescription {
    /// Entity identifier (archive-local, e.g. "1")
    pub id: String,

    /// Molecular kind
    pub entity_type: EntityType,
}

/// One physical chain instance of an entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainDescription {
    /// Structure-level chain identifier
    pub asym_id: String,

    /// Depositor's chain identifier, the key used by external mapping resources
    pub auth_asym_id: String,

    /// Owning entity
    pub entity_id: String,
}

/// One embedded reference-sequence alignment row
///
/// The aligned length is derived from the entity residue range; inconsistent
/// depositions can yield a non-positive length, which the grouping stage
/// rejects rather than this model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceAlignmentRow {
    pub entity_id: String,
    pub database_name: String,
    pub database_accession: String,
    #[serde(default)]
    pub database_isoform: Option<String>,
    pub entity_beg: i64,
    pub entity_end: i64,
    pub database_beg: i64,
}

impl ReferenceAlignmentRow {
    /// Convert to an alignment segment value.
    ///
    /// Deposited accession fields occasionally carry stray whitespace.
    pub fn segment(&self) -> AlignmentSegment {
        AlignmentSegment {
            database_name: strip_whitespace(&self.database_name),
            database_accession: strip_whitespace(&self.database_accession),
            database_isoform: self.database_isoform.as_deref().map(strip_whitespace),
            entity_beg: self.entity_beg,
            database_beg: self.database_beg,
            length: self.entity_end - self.entity_beg + 1,
        }
    }
}

/// One row of a source-organism category
///
/// Shared across the three categories; the engineered category additionally
/// populates the host fields, and computational models may carry a per-row
/// `provenance`. Name, taxonomy, and range fields may pack several
/// comma-delimited values into one row (multiple co-deposited organisms).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceOrganismRow {
    pub entity_id: String,

    /// Part index within the entity (1-based); reassigned on expansion
    #[serde(default)]
    pub part_id: Option<u32>,

    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,

    /// Raw taxonomy identifier field; may be comma-delimited or carry
    /// non-numeric punctuation
    #[serde(default)]
    pub taxonomy_id: Option<String>,

    #[serde(default)]
    pub beg_seq_num: Option<String>,
    #[serde(default)]
    pub end_seq_num: Option<String>,

    /// Comma-delimited gene names (engineered and natural categories)
    #[serde(default)]
    pub gene_names: Option<String>,

    #[serde(default)]
    pub host_scientific_name: Option<String>,
    #[serde(default)]
    pub host_common_name: Option<String>,
    #[serde(default)]
    pub host_taxonomy_id: Option<String>,

    /// Transient provenance tag, consumed only for computational models
    #[serde(default)]
    pub provenance: Option<String>,
}

/// The deposited content of one archive entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub entry_id: String,

    /// True for computationally-derived model entries
    #[serde(default)]
    pub computational_model: bool,

    #[serde(default)]
    pub entities: Vec<EntityDescription>,

    #[serde(default)]
    pub chains: Vec<ChainDescription>,

    /// Embedded reference-sequence alignments
    #[serde(default)]
    pub reference_alignments: Vec<ReferenceAlignmentRow>,

    /// Genetically-engineered source category (highest selection preference)
    #[serde(default)]
    pub engineered_sources: Vec<SourceOrganismRow>,

    /// Natural source category
    #[serde(default)]
    pub natural_sources: Vec<SourceOrganismRow>,

    /// Synthetic source category (lowest selection preference)
    #[serde(default)]
    pub synthetic_sources: Vec<SourceOrganismRow>,
}

impl EntryRecord {
    /// Look up an entity's declared type
    pub fn entity_type(&self, entity_id: &str) -> Option<EntityType> {
        self.entities
            .iter()
            .find(|e| e.id == entity_id)
            .map(|e| e.entity_type)
    }

    /// True when no source-organism category carries any rows
    pub fn has_source_organisms(&self) -> bool {
        !self.engineered_sources.is_empty()
            || !self.natural_sources.is_empty()
            || !self.synthetic_sources.is_empty()
    }
}
