//! Record annotation facade
//!
//! [`Annotator`] wires the alignment resolver and the organism aggregator to
//! the injected read-only resources and runs both against one record at a
//! time. Options are explicit values threaded through the constructor; there
//! is no ambient configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::resolver::{AlignmentResolver, AlignmentRow};
use crate::align::ChainAlignmentSource;
use crate::organism::{EntitySourceSummary, OrganismAggregator, OrganismRow};
use crate::record::EntryRecord;
use crate::taxonomy::{TaxonomyResolver, TaxonomySource};

/// Processing options for one annotator instance
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Replace embedded alignments with the external curated mapping where
    /// the mapping knows the entity. Requires an external source to be wired.
    pub use_external_alignments: bool,
}

/// All derived content for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub entry_id: String,
    pub alignments: Vec<AlignmentRow>,
    pub source_organisms: Vec<OrganismRow>,
    pub host_organisms: Vec<OrganismRow>,
    pub entity_summaries: Vec<EntitySourceSummary>,
    pub taxonomy_count_total: u32,
}

/// Annotates records against injected reference resources.
///
/// Stateless across records: resolution is a pure function of the record and
/// the resources, so a caller may share one annotator across threads and
/// batch records however it likes.
pub struct Annotator {
    options: EngineOptions,
    taxonomy: Arc<dyn TaxonomySource + Send + Sync>,
    external: Option<Arc<dyn ChainAlignmentSource + Send + Sync>>,
}

impl Annotator {
    pub fn new(
        options: EngineOptions,
        taxonomy: Arc<dyn TaxonomySource + Send + Sync>,
        external: Option<Arc<dyn ChainAlignmentSource + Send + Sync>>,
    ) -> Self {
        Self {
            options,
            taxonomy,
            external,
        }
    }

    /// Annotate one record. Never fails: per-entity problems are logged and
    /// that entity's contribution is omitted, and a record missing a whole
    /// precondition (no entities, no source categories) simply produces the
    /// corresponding empty sections.
    pub fn annotate(&self, record: &EntryRecord) -> AnnotationReport {
        let external: Option<&dyn ChainAlignmentSource> = match &self.external {
            Some(source) => Some(source.as_ref()),
            None => None,
        };

        let alignments = if record.entities.is_empty() {
            debug!("{}: no entities, skipping annotation", record.entry_id);
            Vec::new()
        } else {
            let resolver =
                AlignmentResolver::new(self.options.use_external_alignments, external);
            resolver.build_rows(record)
        };

        let organisms = if record.entities.is_empty() {
            None
        } else {
            let aggregator =
                OrganismAggregator::new(TaxonomyResolver::new(self.taxonomy.clone()));
            aggregator.aggregate(record)
        };

        match organisms {
            Some(organisms) => AnnotationReport {
                entry_id: record.entry_id.clone(),
                alignments,
                source_organisms: organisms.source_organisms,
                host_organisms: organisms.host_organisms,
                entity_summaries: organisms.entity_summaries,
                taxonomy_count_total: organisms.taxonomy_count_total,
            },
            None => AnnotationReport {
                entry_id: record.entry_id.clone(),
                alignments,
                source_organisms: Vec::new(),
                host_organisms: Vec::new(),
                entity_summaries: Vec::new(),
                taxonomy_count_total: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::TaxonomyStore;

    fn annotator() -> Annotator {
        let store = TaxonomyStore::from_taxdump(
            "1\t|\t1\t|\tno rank\t|\n9606\t|\t1\t|\tspecies\t|",
            "1\t|\troot\t|\t\t|\tscientific name\t|\n\
             9606\t|\tHomo sapiens\t|\t\t|\tscientific name\t|",
            "",
        )
        .unwrap();
        Annotator::new(EngineOptions::default(), Arc::new(store), None)
    }

    #[test]
    fn test_empty_record_yields_empty_report() {
        let record: EntryRecord = serde_json::from_str(r#"{ "entry_id": "1ABC" }"#).unwrap();
        let report = annotator().annotate(&record);
        assert_eq!(report.entry_id, "1ABC");
        assert!(report.alignments.is_empty());
        assert!(report.source_organisms.is_empty());
        assert!(report.entity_summaries.is_empty());
        assert_eq!(report.taxonomy_count_total, 0);
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let record: EntryRecord = serde_json::from_str(
            r#"{
                "entry_id": "1ABC",
                "entities": [ { "id": "1", "entity_type": "polymer" } ],
                "reference_alignments": [
                    { "entity_id": "1", "database_name": "UNP",
                      "database_accession": "P01901",
                      "entity_beg": 1, "entity_end": 120, "database_beg": 22 }
                ],
                "natural_sources": [
                    { "entity_id": "1", "taxonomy_id": "9606",
                      "scientific_name": "Homo sapiens" }
                ]
            }"#,
        )
        .unwrap();
        let annotator = annotator();
        let first = serde_json::to_string(&annotator.annotate(&record)).unwrap();
        let second = serde_json::to_string(&annotator.annotate(&record)).unwrap();
        assert_eq!(first, second);
    }
}
