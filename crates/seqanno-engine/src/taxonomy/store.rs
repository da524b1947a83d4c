//! In-memory taxonomy store
//!
//! Holds the parsed taxdump content and answers the [`TaxonomySource`]
//! lookups: merged-identifier canonicalization, names by class, reverse
//! name lookup, and the root-to-self lineage walk over parent links.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use seqanno_common::Result;

use super::parser::{MergedRow, NameRow, NodeRow, TaxdumpParser};
use super::{LineageNode, TaxonomySource};

/// Name classes treated as common names, in emission priority order
const COMMON_NAME_CLASSES: [&str; 2] = ["common name", "genbank common name"];

/// Upper bound on lineage length; a longer walk means a parent-link cycle
const MAX_LINEAGE_DEPTH: usize = 100;

/// Taxdump-backed implementation of [`TaxonomySource`]
#[derive(Debug, Default)]
pub struct TaxonomyStore {
    merged: HashMap<u32, u32>,
    parents: HashMap<u32, u32>,
    scientific: HashMap<u32, String>,
    common: HashMap<u32, Vec<String>>,
    by_name: HashMap<String, u32>,
}

impl TaxonomyStore {
    /// Build a store from parsed taxdump rows
    pub fn from_rows(nodes: Vec<NodeRow>, names: Vec<NameRow>, merged: Vec<MergedRow>) -> Self {
        let mut store = Self::default();

        for node in nodes {
            store.parents.insert(node.taxon_id, node.parent_id);
        }
        for row in merged {
            store.merged.insert(row.old_taxon_id, row.new_taxon_id);
        }
        for name in names {
            match name.name_class.as_str() {
                "scientific name" => {
                    store.by_name.insert(name.name.to_lowercase(), name.taxon_id);
                    store.scientific.insert(name.taxon_id, name.name);
                },
                "equivalent name" => {
                    store.by_name.insert(name.name.to_lowercase(), name.taxon_id);
                },
                class if COMMON_NAME_CLASSES.contains(&class) => {
                    store.common.entry(name.taxon_id).or_default().push(name.name);
                },
                _ => {},
            }
        }
        store
    }

    /// Parse taxdump file contents into a store
    pub fn from_taxdump(nodes: &str, names: &str, merged: &str) -> Result<Self> {
        let parser = TaxdumpParser::new();
        let nodes = parser.parse_nodes(nodes)?;
        let names = parser.parse_names(names)?;
        let merged = parser.parse_merged(merged)?;
        Ok(Self::from_rows(nodes, names, merged))
    }

    /// Load `nodes.dmp`, `names.dmp`, and `merged.dmp` from a directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let nodes = std::fs::read_to_string(dir.join("nodes.dmp"))?;
        let names = std::fs::read_to_string(dir.join("names.dmp"))?;
        let merged = std::fs::read_to_string(dir.join("merged.dmp"))?;
        let store = Self::from_taxdump(&nodes, &names, &merged)?;
        info!(
            "Loaded taxonomy store from {}: {} taxa, {} merged ids",
            dir.display(),
            store.len(),
            store.merged.len()
        );
        Ok(store)
    }

    /// Number of known taxa
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True when the store holds no taxa
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    fn name_of(&self, taxon_id: u32) -> String {
        self.scientific
            .get(&taxon_id)
            .cloned()
            .unwrap_or_else(|| taxon_id.to_string())
    }
}

impl TaxonomySource for TaxonomyStore {
    fn merged_id(&self, taxon_id: u32) -> u32 {
        // Successors can themselves be retired; chase the chain with a hop
        // cap so a malformed merged table cannot loop.
        let mut current = taxon_id;
        for _ in 0..MAX_LINEAGE_DEPTH {
            match self.merged.get(&current) {
                Some(&next) if next != current => current = next,
                _ => return current,
            }
        }
        warn!("Merged-id chain for taxon {} did not converge", taxon_id);
        current
    }

    fn scientific_name(&self, taxon_id: u32) -> Option<String> {
        self.scientific.get(&taxon_id).cloned()
    }

    fn parent_scientific_name(&self, taxon_id: u32) -> Option<String> {
        let parent = self.parents.get(&taxon_id)?;
        self.scientific.get(parent).cloned()
    }

    fn common_names(&self, taxon_id: u32) -> Vec<String> {
        self.common.get(&taxon_id).cloned().unwrap_or_default()
    }

    fn lineage(&self, taxon_id: u32) -> Option<Vec<LineageNode>> {
        if !self.parents.contains_key(&taxon_id) {
            return None;
        }

        // Walk self-to-root, then reverse into root-first order.
        let mut chain = Vec::new();
        let mut current = taxon_id;
        loop {
            chain.push(current);
            if chain.len() > MAX_LINEAGE_DEPTH {
                warn!("Lineage walk for taxon {} exceeded depth cap", taxon_id);
                return None;
            }
            match self.parents.get(&current) {
                Some(&parent) if parent != current => current = parent,
                Some(_) => break,
                None => {
                    warn!(
                        "Broken parent link at taxon {} while resolving {}",
                        current, taxon_id
                    );
                    return None;
                },
            }
        }

        Some(
            chain
                .into_iter()
                .rev()
                .enumerate()
                .map(|(i, id)| LineageNode {
                    depth: (i + 1) as u32,
                    taxon_id: id,
                    name: self.name_of(id),
                })
                .collect(),
        )
    }

    fn taxon_id_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(&name.trim().to_lowercase()).copied()
    }
}
