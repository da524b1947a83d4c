//! Error types for seqanno

use thiserror::Error;

/// Result type alias for seqanno operations
pub type Result<T> = std::result::Result<T, AnnoError>;

/// Main error type for seqanno
///
/// Messages are user-facing: they name the offending input and, where it
/// helps, what to check.
#[derive(Error, Debug)]
pub enum AnnoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}. Check the file syntax.")]
    JsonParse(#[from] serde_json::Error),

    #[error("Malformed record {entry_id}: {reason}")]
    MalformedRecord { entry_id: String, reason: String },

    #[error("Malformed resource file '{path}': {reason}")]
    MalformedResource { path: String, reason: String },

    #[error("Unknown taxonomy identifier: {0}")]
    UnknownTaxon(u32),

    #[error("Record file not found: '{0}'. Verify the path exists and is readable.")]
    RecordNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnnoError {
    /// Create a malformed-record error
    pub fn malformed_record(entry_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            entry_id: entry_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed-resource error
    pub fn malformed_resource(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
