//! Taxonomic lineage resolution
//!
//! Maps raw organism identifiers, including merged/retired ones, to a
//! canonical identifier, names, and an ordered root-to-self ancestor chain.
//! [`TaxonomySource`] is the seam between the resolver and whatever backs
//! the data; [`store::TaxonomyStore`] is the taxdump-backed implementation.

pub mod parser;
pub mod resolver;
pub mod store;

use serde::{Deserialize, Serialize};

pub use resolver::{TaxonNode, TaxonomyResolver};
pub use store::TaxonomyStore;

/// One ancestor in a root-to-self lineage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageNode {
    /// Position in the chain, root = 1, strictly increasing toward self
    pub depth: u32,
    pub taxon_id: u32,
    pub name: String,
}

/// Read-only taxonomy lookups
///
/// Implementations answer by identifier; [`TaxonomySource::merged_id`] must
/// be idempotent (an already-canonical identifier maps to itself) and every
/// other accessor expects canonical identifiers.
pub trait TaxonomySource {
    /// Canonical identifier for a possibly merged/retired one
    fn merged_id(&self, taxon_id: u32) -> u32;

    fn scientific_name(&self, taxon_id: u32) -> Option<String>;

    fn parent_scientific_name(&self, taxon_id: u32) -> Option<String>;

    /// Common names in resource order, duplicates included
    fn common_names(&self, taxon_id: u32) -> Vec<String>;

    /// Root-to-self lineage, or `None` when the taxon is unknown or its
    /// parent chain is broken
    fn lineage(&self, taxon_id: u32) -> Option<Vec<LineageNode>>;

    /// Reverse lookup by scientific (or equivalent) name
    fn taxon_id_by_name(&self, name: &str) -> Option<u32>;
}
