//! Taxon resolution
//!
//! [`TaxonomyResolver`] turns a raw, possibly retired identifier into a
//! [`TaxonNode`]: canonical identifier first, then names and lineage against
//! the canonical identifier only. A failed lineage retrieval is reported and
//! leaves the rest of the node intact, so downstream emission can still
//! populate the name fields.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use seqanno_common::text::dedup_case_insensitive;

use super::{LineageNode, TaxonomySource};

/// One resolved taxon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonNode {
    /// Canonical identifier (after merged-id mapping)
    pub taxon_id: u32,
    pub scientific_name: Option<String>,
    pub parent_scientific_name: Option<String>,
    /// Case-insensitively deduplicated, first-seen casing preserved
    pub common_names: Vec<String>,
    /// Root-to-self ancestors; `None` when retrieval failed
    pub lineage: Option<Vec<LineageNode>>,
}

/// Resolves raw taxonomy identifiers against an injected source
#[derive(Clone)]
pub struct TaxonomyResolver {
    source: Arc<dyn TaxonomySource + Send + Sync>,
}

impl TaxonomyResolver {
    pub fn new(source: Arc<dyn TaxonomySource + Send + Sync>) -> Self {
        Self { source }
    }

    /// Resolve a raw identifier; `None` when the source knows nothing at all
    /// about the canonical identifier.
    pub fn resolve(&self, raw_taxon_id: u32) -> Option<TaxonNode> {
        let taxon_id = self.source.merged_id(raw_taxon_id);

        let scientific_name = self.source.scientific_name(taxon_id);
        let parent_scientific_name = self.source.parent_scientific_name(taxon_id);
        let common_names = dedup_case_insensitive(&self.source.common_names(taxon_id));
        let lineage = self.checked_lineage(taxon_id);

        if scientific_name.is_none() && lineage.is_none() && common_names.is_empty() {
            return None;
        }

        Some(TaxonNode {
            taxon_id,
            scientific_name,
            parent_scientific_name,
            common_names,
            lineage,
        })
    }

    /// Name-based salvage lookup for rows lacking an identifier
    pub fn taxon_id_by_name(&self, name: &str) -> Option<u32> {
        self.source.taxon_id_by_name(name)
    }

    /// Fetch and validate a lineage: depths strictly increasing and the last
    /// entry equal to the canonical identifier. A malformed chain is dropped
    /// with a warning, not propagated.
    fn checked_lineage(&self, taxon_id: u32) -> Option<Vec<LineageNode>> {
        let lineage = match self.source.lineage(taxon_id) {
            Some(lineage) if !lineage.is_empty() => lineage,
            Some(_) | None => {
                warn!("No lineage available for taxon {}", taxon_id);
                return None;
            },
        };

        let monotonic = lineage.windows(2).all(|w| w[0].depth < w[1].depth);
        let ends_at_self = lineage.last().map(|n| n.taxon_id) == Some(taxon_id);
        if !monotonic || !ends_at_self {
            warn!("Malformed lineage for taxon {}: dropping it", taxon_id);
            return None;
        }
        Some(lineage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSource {
        merged: HashMap<u32, u32>,
        scientific: HashMap<u32, String>,
        common: HashMap<u32, Vec<String>>,
        lineages: HashMap<u32, Vec<LineageNode>>,
    }

    impl TaxonomySource for FakeSource {
        fn merged_id(&self, taxon_id: u32) -> u32 {
            self.merged.get(&taxon_id).copied().unwrap_or(taxon_id)
        }

        fn scientific_name(&self, taxon_id: u32) -> Option<String> {
            self.scientific.get(&taxon_id).cloned()
        }

        fn parent_scientific_name(&self, _taxon_id: u32) -> Option<String> {
            None
        }

        fn common_names(&self, taxon_id: u32) -> Vec<String> {
            self.common.get(&taxon_id).cloned().unwrap_or_default()
        }

        fn lineage(&self, taxon_id: u32) -> Option<Vec<LineageNode>> {
            self.lineages.get(&taxon_id).cloned()
        }

        fn taxon_id_by_name(&self, name: &str) -> Option<u32> {
            self.scientific
                .iter()
                .find(|(_, n)| n.eq_ignore_ascii_case(name))
                .map(|(id, _)| *id)
        }
    }

    fn human_source() -> FakeSource {
        let mut source = FakeSource::default();
        source.merged.insert(63221, 9606);
        source.scientific.insert(9606, "Homo sapiens".to_string());
        source
            .common
            .insert(9606, vec!["Human".to_string(), "human".to_string()]);
        source.lineages.insert(
            9606,
            vec![
                LineageNode { depth: 1, taxon_id: 1, name: "root".to_string() },
                LineageNode { depth: 2, taxon_id: 9605, name: "Homo".to_string() },
                LineageNode { depth: 3, taxon_id: 9606, name: "Homo sapiens".to_string() },
            ],
        );
        source
    }

    #[test]
    fn test_resolve_canonicalizes_first() {
        let resolver = TaxonomyResolver::new(Arc::new(human_source()));
        let node = resolver.resolve(63221).unwrap();
        assert_eq!(node.taxon_id, 9606);
        assert_eq!(node.scientific_name.as_deref(), Some("Homo sapiens"));
    }

    #[test]
    fn test_common_names_deduped_first_seen_casing() {
        let resolver = TaxonomyResolver::new(Arc::new(human_source()));
        let node = resolver.resolve(9606).unwrap();
        assert_eq!(node.common_names, vec!["Human".to_string()]);
    }

    #[test]
    fn test_missing_lineage_keeps_other_fields() {
        let mut source = human_source();
        source.lineages.clear();
        let resolver = TaxonomyResolver::new(Arc::new(source));
        let node = resolver.resolve(9606).unwrap();
        assert!(node.lineage.is_none());
        assert_eq!(node.scientific_name.as_deref(), Some("Homo sapiens"));
    }

    #[test]
    fn test_malformed_lineage_dropped() {
        let mut source = human_source();
        // depths not strictly increasing
        source.lineages.insert(
            9606,
            vec![
                LineageNode { depth: 2, taxon_id: 1, name: "root".to_string() },
                LineageNode { depth: 2, taxon_id: 9606, name: "Homo sapiens".to_string() },
            ],
        );
        let resolver = TaxonomyResolver::new(Arc::new(source));
        assert!(resolver.resolve(9606).unwrap().lineage.is_none());
    }

    #[test]
    fn test_unknown_taxon_is_not_found() {
        let resolver = TaxonomyResolver::new(Arc::new(FakeSource::default()));
        assert!(resolver.resolve(424242).is_none());
    }

    #[test]
    fn test_lineage_monotonic_and_ends_at_canonical() {
        let resolver = TaxonomyResolver::new(Arc::new(human_source()));
        let node = resolver.resolve(63221).unwrap();
        let lineage = node.lineage.unwrap();
        assert!(lineage.windows(2).all(|w| w[0].depth < w[1].depth));
        assert_eq!(lineage.last().unwrap().taxon_id, node.taxon_id);
    }
}
