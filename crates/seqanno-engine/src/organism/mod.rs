//! Source and host organism aggregation
//!
//! Selects each entity's source-organism rows from the deposited categories,
//! expands rows that pack several co-deposited organisms into delimited
//! fields, resolves every taxon through the taxonomy resolver, and emits
//! order-correlated assignment rows plus per-entity summary counters.

pub mod aggregator;
pub mod expand;

pub use aggregator::{
    EntitySourceSummary, OrganismAggregator, OrganismAnnotations, OrganismRow, SourceType,
};
