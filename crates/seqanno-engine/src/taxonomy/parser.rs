//! Taxonomy dump file parser
//!
//! Parses the NCBI-style taxdump files backing the taxonomy store:
//! - `nodes.dmp`: parent links and ranks
//! - `names.dmp`: names per taxon with a name class
//! - `merged.dmp`: merged taxonomy IDs (old → new)
//!
//! # File Format
//! The .dmp files use a tab-delimited format with pipe separators: `\t|\t`.
//! Lines end with `\t|` and newline. A malformed line is logged and skipped;
//! it never fails the whole file.

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// One `nodes.dmp` row: a taxon and its parent
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub taxon_id: u32,
    pub parent_id: u32,
    pub rank: String,
}

/// One `names.dmp` row
#[derive(Debug, Clone, PartialEq)]
pub struct NameRow {
    pub taxon_id: u32,
    pub name: String,
    /// Name class, e.g. "scientific name", "common name", "genbank common name"
    pub name_class: String,
}

/// One `merged.dmp` row: a retired identifier and its successor
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub old_taxon_id: u32,
    pub new_taxon_id: u32,
}

/// Parser for taxonomy dump files
#[derive(Debug, Default)]
pub struct TaxdumpParser;

impl TaxdumpParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse nodes.dmp content
    ///
    /// # Format
    /// ```text
    /// tax_id | parent_tax_id | rank | ...
    /// 9606 | 9605 | species | ...
    /// ```
    pub fn parse_nodes(&self, content: &str) -> Result<Vec<NodeRow>> {
        let mut nodes = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_nodes_line(line, line_num + 1) {
                Ok(node) => nodes.push(node),
                Err(e) => {
                    warn!("Failed to parse nodes line {}: {} - Error: {}", line_num + 1, line, e);
                },
            }
        }
        debug!("Parsed {} taxonomy nodes", nodes.len());
        Ok(nodes)
    }

    /// Parse a single line from nodes.dmp
    pub fn parse_nodes_line(&self, line: &str, line_num: usize) -> Result<NodeRow> {
        let fields = split_dmp_line(line);
        if fields.len() < 3 {
            anyhow::bail!(
                "Line {}: Expected at least 3 fields, got {}",
                line_num,
                fields.len()
            );
        }

        let taxon_id: u32 = fields[0]
            .parse()
            .with_context(|| format!("Line {}: Invalid tax_id: {}", line_num, fields[0]))?;
        let parent_id: u32 = fields[1]
            .parse()
            .with_context(|| format!("Line {}: Invalid parent_tax_id: {}", line_num, fields[1]))?;

        Ok(NodeRow {
            taxon_id,
            parent_id,
            rank: fields[2].to_string(),
        })
    }

    /// Parse names.dmp content
    ///
    /// # Format
    /// ```text
    /// tax_id | name_txt | unique name | name class |
    /// 9606 | Homo sapiens |  | scientific name |
    /// 9606 | human |  | genbank common name |
    /// ```
    pub fn parse_names(&self, content: &str) -> Result<Vec<NameRow>> {
        let mut names = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_names_line(line, line_num + 1) {
                Ok(name) => names.push(name),
                Err(e) => {
                    warn!("Failed to parse names line {}: {} - Error: {}", line_num + 1, line, e);
                },
            }
        }
        debug!("Parsed {} taxonomy names", names.len());
        Ok(names)
    }

    /// Parse a single line from names.dmp
    pub fn parse_names_line(&self, line: &str, line_num: usize) -> Result<NameRow> {
        let fields = split_dmp_line(line);
        if fields.len() < 4 {
            anyhow::bail!(
                "Line {}: Expected at least 4 fields, got {}",
                line_num,
                fields.len()
            );
        }

        let taxon_id: u32 = fields[0]
            .parse()
            .with_context(|| format!("Line {}: Invalid tax_id: {}", line_num, fields[0]))?;

        Ok(NameRow {
            taxon_id,
            name: fields[1].to_string(),
            name_class: fields[3].to_string(),
        })
    }

    /// Parse merged.dmp content
    ///
    /// # Format
    /// ```text
    /// old_tax_id | new_tax_id |
    /// 123 | 456 |
    /// ```
    pub fn parse_merged(&self, content: &str) -> Result<Vec<MergedRow>> {
        let mut merged = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_merged_line(line, line_num + 1) {
                Ok(row) => merged.push(row),
                Err(e) => {
                    warn!("Failed to parse merged line {}: {} - Error: {}", line_num + 1, line, e);
                },
            }
        }
        debug!("Parsed {} merged taxa", merged.len());
        Ok(merged)
    }

    /// Parse a single line from merged.dmp
    pub fn parse_merged_line(&self, line: &str, line_num: usize) -> Result<MergedRow> {
        let fields = split_dmp_line(line);
        if fields.len() < 2 {
            anyhow::bail!(
                "Line {}: Expected at least 2 fields, got {}",
                line_num,
                fields.len()
            );
        }

        let old_taxon_id: u32 = fields[0]
            .parse()
            .with_context(|| format!("Line {}: Invalid old_tax_id: {}", line_num, fields[0]))?;
        let new_taxon_id: u32 = fields[1]
            .parse()
            .with_context(|| format!("Line {}: Invalid new_tax_id: {}", line_num, fields[1]))?;

        Ok(MergedRow {
            old_taxon_id,
            new_taxon_id,
        })
    }
}

/// Split one .dmp line on `\t|\t`, trimming the trailing `\t|`.
fn split_dmp_line(line: &str) -> Vec<&str> {
    line.split("\t|\t")
        .map(|f| f.trim().trim_end_matches('|').trim())
        .collect()
}
