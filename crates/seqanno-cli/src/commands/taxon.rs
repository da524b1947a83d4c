//! Single-taxon lookup
//!
//! Operator debugging aid: resolve one identifier the same way the organism
//! aggregator does and print what the taxonomy resource knows about it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use seqanno_engine::taxonomy::{TaxonomyResolver, TaxonomyStore};

/// Run the taxon command
pub fn execute(taxon_id: u32, taxonomy_dir: &Path) -> Result<()> {
    let store = TaxonomyStore::load_dir(taxonomy_dir)
        .with_context(|| format!("Failed to load taxonomy from {}", taxonomy_dir.display()))?;
    let resolver = TaxonomyResolver::new(Arc::new(store));

    let Some(node) = resolver.resolve(taxon_id) else {
        anyhow::bail!("Taxonomy identifier {} is unknown to the resource", taxon_id);
    };

    if node.taxon_id != taxon_id {
        println!("{} is merged into {}", taxon_id, node.taxon_id);
    }
    println!("taxon id:     {}", node.taxon_id);
    println!(
        "scientific:   {}",
        node.scientific_name.as_deref().unwrap_or("-")
    );
    println!(
        "parent:       {}",
        node.parent_scientific_name.as_deref().unwrap_or("-")
    );
    if !node.common_names.is_empty() {
        println!("common names: {}", node.common_names.join("; "));
    }
    match node.lineage {
        Some(lineage) => {
            println!("lineage:");
            for ancestor in lineage {
                println!(
                    "  {:>3}  {:>9}  {}",
                    ancestor.depth, ancestor.taxon_id, ancestor.name
                );
            }
        },
        None => println!("lineage:      unavailable"),
    }
    Ok(())
}
