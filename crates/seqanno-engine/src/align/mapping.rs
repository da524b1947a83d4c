//! Chain mapping summary resource
//!
//! JSON-backed implementation of [`ChainAlignmentSource`]. The resource file
//! is a two-level map, entry id to depositor chain id to mapped regions:
//!
//! ```json
//! {
//!   "1ABC": {
//!     "A": [
//!       { "database_name": "UNP", "database_accession": "P01901",
//!         "entity_beg": 1, "entity_end": 140, "database_beg": 22 }
//!     ]
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use seqanno_common::Result;

use super::external::ChainAlignmentSource;
use super::model::AlignmentSegment;

/// One mapped region of a chain against a reference sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedRegion {
    pub database_name: String,
    pub database_accession: String,
    #[serde(default)]
    pub database_isoform: Option<String>,
    pub entity_beg: i64,
    pub entity_end: i64,
    pub database_beg: i64,
}

impl MappedRegion {
    fn segment(&self) -> AlignmentSegment {
        AlignmentSegment {
            database_name: self.database_name.clone(),
            database_accession: self.database_accession.clone(),
            database_isoform: self.database_isoform.clone(),
            entity_beg: self.entity_beg,
            database_beg: self.database_beg,
            length: self.entity_end - self.entity_beg + 1,
        }
    }
}

/// In-memory curated chain mapping, loaded once and queried per chain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainMappingSummary {
    entries: HashMap<String, HashMap<String, Vec<MappedRegion>>>,
}

impl ChainMappingSummary {
    /// Load the summary from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let summary: Self = serde_json::from_str(&content)?;
        info!(
            "Loaded chain mapping summary for {} entries from {}",
            summary.entries.len(),
            path.display()
        );
        Ok(summary)
    }

    /// Load the summary from any reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Number of entries covered by the resource
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the resource covers no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ChainAlignmentSource for ChainMappingSummary {
    fn alignments(&self, entry_id: &str, auth_asym_id: &str) -> Vec<AlignmentSegment> {
        self.entries
            .get(entry_id)
            .and_then(|chains| chains.get(auth_asym_id))
            .map(|regions| regions.iter().map(MappedRegion::segment).collect())
            .unwrap_or_default()
    }
}
