//! Organism aggregation and taxonomy emission
//!
//! One entity gets its organisms from exactly one source category: the first
//! category in preference order (genetically engineered, then natural, then
//! synthetic) that yields any rows wins, and the rest are not consulted.
//! Host organisms ride along on the engineered category regardless of which
//! category won. Every assignment with a usable taxon identifier is resolved
//! to its canonical identifier, names, and lineage.

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use seqanno_common::text::{dedup_case_insensitive, is_placeholder, split_delimited};

use crate::align::model::Provenance;
use crate::record::{EntryRecord, SourceOrganismRow};
use crate::taxonomy::TaxonomyResolver;

use super::expand::{expand_field, field_arity, FIELD_DELIMITER};

/// Provenance tag for model assignments with no recorded source
const NO_SOURCE: &str = "no source";

fn non_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9]+").expect("static pattern compiles"))
}

/// Deposited source category of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    GeneticallyEngineered,
    Natural,
    Synthetic,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::GeneticallyEngineered => "genetically engineered",
            SourceType::Natural => "natural",
            SourceType::Synthetic => "synthetic",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted organism assignment
///
/// The three lineage lists are parallel, built from the same deduplicated
/// ancestor sequence; all are empty when lineage retrieval failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismRow {
    pub entity_id: String,

    /// 1-based part index within the entity
    pub part_id: u32,

    /// Absent on host rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,

    pub provenance: String,

    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub beg_seq_num: Option<String>,
    #[serde(default)]
    pub end_seq_num: Option<String>,
    #[serde(default)]
    pub gene_names: Vec<String>,

    /// Canonical taxonomy identifier, set only when resolution succeeded
    #[serde(default)]
    pub taxonomy_id: Option<u32>,
    #[serde(default)]
    pub ncbi_scientific_name: Option<String>,
    #[serde(default)]
    pub ncbi_parent_scientific_name: Option<String>,
    #[serde(default)]
    pub ncbi_common_names: Vec<String>,
    #[serde(default)]
    pub taxonomy_lineage_depths: Vec<u32>,
    #[serde(default)]
    pub taxonomy_lineage_ids: Vec<u32>,
    #[serde(default)]
    pub taxonomy_lineage_names: Vec<String>,
}

/// Per-entity summary counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySourceSummary {
    pub entity_id: String,

    /// Assignments emitted for the entity
    pub part_count: u32,

    /// True when the entity carries more than one assignment
    pub multiple_source: bool,

    /// Distinct canonical taxon identifiers seen for the entity
    pub taxonomy_count: u32,
}

/// Full organism output for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismAnnotations {
    pub source_organisms: Vec<OrganismRow>,
    pub host_organisms: Vec<OrganismRow>,
    pub entity_summaries: Vec<EntitySourceSummary>,

    /// Sum of per-entity distinct-taxon counts
    pub taxonomy_count_total: u32,
}

/// The delimited fields of one deposited row, source or host side
struct RawOrganismFields<'a> {
    part_id: Option<u32>,
    scientific_name: Option<&'a str>,
    common_name: Option<&'a str>,
    taxonomy_id: Option<String>,
    beg_seq_num: Option<&'a str>,
    end_seq_num: Option<&'a str>,
    gene_names: Option<&'a str>,
}

/// One expanded assignment before taxonomy resolution
struct Assignment {
    part_id: u32,
    scientific_name: Option<String>,
    common_name: Option<String>,
    taxonomy_id: Option<String>,
    beg_seq_num: Option<String>,
    end_seq_num: Option<String>,
    gene_names: Option<String>,
}

/// Aggregates organism categories into emitted rows and counters
pub struct OrganismAggregator {
    resolver: TaxonomyResolver,
}

impl OrganismAggregator {
    pub fn new(resolver: TaxonomyResolver) -> Self {
        Self { resolver }
    }

    /// Aggregate one record. Returns `None` when no source-organism category
    /// carries rows, the record-level "not applicable" signal.
    pub fn aggregate(&self, record: &EntryRecord) -> Option<OrganismAnnotations> {
        if !record.has_source_organisms() {
            return None;
        }

        let mut source_organisms = Vec::new();
        let mut host_organisms = Vec::new();
        let mut entity_summaries = Vec::new();
        let mut taxonomy_count_total = 0u32;

        for entity in &record.entities {
            let provenance = self.entity_provenance(record, &entity.id);
            let (source_type, rows) = select_category(record, &entity.id);

            let mut part_count = 0u32;
            let mut entity_taxa: BTreeSet<u32> = BTreeSet::new();

            for (index, row) in rows.iter().enumerate() {
                let fields = self.source_fields(record, row);
                let assignments = expand_row(fields, index as u32 + 1);
                part_count += assignments.len() as u32;
                for assignment in assignments {
                    let mut out = self.emit_row(record, &entity.id, assignment, &provenance);
                    out.source_type = source_type;
                    if let Some(taxon_id) = out.taxonomy_id {
                        entity_taxa.insert(taxon_id);
                    }
                    source_organisms.push(out);
                }
            }

            // Host organisms always come off the engineered category, even
            // when another category supplied the source rows.
            for (index, row) in record
                .engineered_sources
                .iter()
                .filter(|r| r.entity_id == entity.id)
                .enumerate()
            {
                let fields = self.host_fields(record, row);
                if fields_empty(&fields) {
                    continue;
                }
                for assignment in expand_row(fields, index as u32 + 1) {
                    host_organisms.push(self.emit_row(record, &entity.id, assignment, &provenance));
                }
            }

            let taxonomy_count = entity_taxa.len() as u32;
            taxonomy_count_total += taxonomy_count;
            entity_summaries.push(EntitySourceSummary {
                entity_id: entity.id.clone(),
                part_count,
                multiple_source: part_count > 1,
                taxonomy_count,
            });
        }

        Some(OrganismAnnotations {
            source_organisms,
            host_organisms,
            entity_summaries,
            taxonomy_count_total,
        })
    }

    /// Source-side view of a deposited row, with the taxon field salvaged
    /// from the scientific name when the deposition left it empty.
    fn source_fields<'a>(
        &self,
        record: &EntryRecord,
        row: &'a SourceOrganismRow,
    ) -> RawOrganismFields<'a> {
        let taxonomy_id = self.salvage_taxon(
            record,
            row.taxonomy_id.as_deref(),
            row.scientific_name.as_deref(),
        );
        RawOrganismFields {
            part_id: row.part_id,
            scientific_name: row.scientific_name.as_deref(),
            common_name: row.common_name.as_deref(),
            taxonomy_id,
            beg_seq_num: row.beg_seq_num.as_deref(),
            end_seq_num: row.end_seq_num.as_deref(),
            gene_names: row.gene_names.as_deref(),
        }
    }

    /// Host-side view of an engineered-category row.
    fn host_fields<'a>(
        &self,
        record: &EntryRecord,
        row: &'a SourceOrganismRow,
    ) -> RawOrganismFields<'a> {
        let taxonomy_id = self.salvage_taxon(
            record,
            row.host_taxonomy_id.as_deref(),
            row.host_scientific_name.as_deref(),
        );
        RawOrganismFields {
            part_id: row.part_id,
            scientific_name: row.host_scientific_name.as_deref(),
            common_name: row.host_common_name.as_deref(),
            taxonomy_id,
            beg_seq_num: row.beg_seq_num.as_deref(),
            end_seq_num: row.end_seq_num.as_deref(),
            gene_names: None,
        }
    }

    /// Back-fill a missing taxon identifier from the scientific name.
    fn salvage_taxon(
        &self,
        record: &EntryRecord,
        taxonomy_id: Option<&str>,
        scientific_name: Option<&str>,
    ) -> Option<String> {
        if let Some(value) = taxonomy_id {
            if !is_placeholder(value) {
                return Some(value.to_string());
            }
        }
        let name = scientific_name.filter(|n| !is_placeholder(n))?;
        match self.resolver.taxon_id_by_name(name) {
            Some(taxon_id) => {
                debug!(
                    "{} salvaged taxon {} from scientific name {:?}",
                    record.entry_id, taxon_id, name
                );
                Some(taxon_id.to_string())
            },
            None => {
                debug!(
                    "{} taxon salvage failed for scientific name {:?}",
                    record.entry_id, name
                );
                None
            },
        }
    }

    /// Provenance for one entity's assignments. Experimental entries use the
    /// primary archive tag; computational models read the transient per-row
    /// tag from the natural category, falling back to "no source".
    fn entity_provenance(&self, record: &EntryRecord, entity_id: &str) -> String {
        if !record.computational_model {
            return Provenance::PrimaryArchive.as_str().to_string();
        }
        record
            .natural_sources
            .iter()
            .filter(|r| r.entity_id == entity_id)
            .find_map(|r| {
                r.provenance
                    .as_deref()
                    .filter(|p| !is_placeholder(p))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| NO_SOURCE.to_string())
    }

    /// Build one output row and attach resolved taxonomy to it.
    fn emit_row(
        &self,
        record: &EntryRecord,
        entity_id: &str,
        assignment: Assignment,
        provenance: &str,
    ) -> OrganismRow {
        let gene_names = assignment
            .gene_names
            .as_deref()
            .map(|g| dedup_case_insensitive(&split_delimited(g, FIELD_DELIMITER)))
            .unwrap_or_default();

        let mut row = OrganismRow {
            entity_id: entity_id.to_string(),
            part_id: assignment.part_id,
            source_type: None,
            provenance: provenance.to_string(),
            scientific_name: assignment.scientific_name,
            common_name: assignment.common_name,
            beg_seq_num: assignment.beg_seq_num,
            end_seq_num: assignment.end_seq_num,
            gene_names,
            taxonomy_id: None,
            ncbi_scientific_name: None,
            ncbi_parent_scientific_name: None,
            ncbi_common_names: Vec::new(),
            taxonomy_lineage_depths: Vec::new(),
            taxonomy_lineage_ids: Vec::new(),
            taxonomy_lineage_names: Vec::new(),
        };

        let Some(raw) = assignment.taxonomy_id.as_deref() else {
            return row;
        };
        let Some(raw_id) = extract_taxon_id(raw) else {
            warn!(
                "{} entity {}: malformed taxonomy identifier {:?}",
                record.entry_id, entity_id, raw
            );
            return row;
        };
        let Some(node) = self.resolver.resolve(raw_id) else {
            warn!(
                "{} entity {}: unresolvable taxonomy identifier {}",
                record.entry_id, entity_id, raw_id
            );
            return row;
        };

        row.taxonomy_id = Some(node.taxon_id);
        row.ncbi_scientific_name = node.scientific_name;
        row.ncbi_parent_scientific_name = node.parent_scientific_name;
        row.ncbi_common_names = node.common_names;

        if let Some(lineage) = node.lineage {
            // Parallel lists share one identity-deduplicated ancestor order.
            let mut seen = HashSet::new();
            for ancestor in lineage.into_iter().filter(|n| seen.insert(n.clone())) {
                row.taxonomy_lineage_depths.push(ancestor.depth);
                row.taxonomy_lineage_ids.push(ancestor.taxon_id);
                row.taxonomy_lineage_names.push(ancestor.name);
            }
        }
        row
    }
}

/// First populated category in preference order wins for an entity.
fn select_category<'a>(
    record: &'a EntryRecord,
    entity_id: &str,
) -> (Option<SourceType>, Vec<&'a SourceOrganismRow>) {
    let categories: [(SourceType, &Vec<SourceOrganismRow>); 3] = [
        (SourceType::GeneticallyEngineered, &record.engineered_sources),
        (SourceType::Natural, &record.natural_sources),
        (SourceType::Synthetic, &record.synthetic_sources),
    ];
    for (source_type, rows) in categories {
        let selected: Vec<&SourceOrganismRow> =
            rows.iter().filter(|r| r.entity_id == entity_id).collect();
        if !selected.is_empty() {
            return (Some(source_type), selected);
        }
    }
    (None, Vec::new())
}

/// Expand one row into its assignments, re-indexing parts on expansion.
fn expand_row(fields: RawOrganismFields<'_>, fallback_part: u32) -> Vec<Assignment> {
    let n = field_arity(fields.taxonomy_id.as_deref());
    if n <= 1 {
        let clean = |v: Option<&str>| {
            v.filter(|s| !is_placeholder(s)).map(str::to_string)
        };
        return vec![Assignment {
            part_id: fields.part_id.unwrap_or(fallback_part),
            scientific_name: clean(fields.scientific_name),
            common_name: clean(fields.common_name),
            taxonomy_id: fields.taxonomy_id.clone(),
            beg_seq_num: clean(fields.beg_seq_num),
            end_seq_num: clean(fields.end_seq_num),
            gene_names: clean(fields.gene_names),
        }];
    }

    let scientific = expand_field(fields.scientific_name, n);
    let common = expand_field(fields.common_name, n);
    let taxa = expand_field(fields.taxonomy_id.as_deref(), n);
    let beg = expand_field(fields.beg_seq_num, n);
    let end = expand_field(fields.end_seq_num, n);
    let genes = expand_field(fields.gene_names, n);

    (0..n)
        .map(|i| Assignment {
            part_id: i as u32 + 1,
            scientific_name: scientific[i].clone(),
            common_name: common[i].clone(),
            taxonomy_id: taxa[i].clone(),
            beg_seq_num: beg[i].clone(),
            end_seq_num: end[i].clone(),
            gene_names: genes[i].clone(),
        })
        .collect()
}

fn fields_empty(fields: &RawOrganismFields<'_>) -> bool {
    let blank = |v: Option<&str>| v.map_or(true, is_placeholder);
    blank(fields.scientific_name) && blank(fields.common_name) && fields.taxonomy_id.is_none()
}

/// Extract the numeric taxon identifier from a dirty field value.
fn extract_taxon_id(value: &str) -> Option<u32> {
    let digits = non_digit_re().replace_all(value, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
