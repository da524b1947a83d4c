//! Configuration for the seqanno CLI
//!
//! Holds defaults that command-line flags may override. Values come from the
//! environment so batch pipelines can configure one place.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default directory for emitted report files
pub const DEFAULT_OUTPUT_DIR: &str = "./annotations";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for emitted report files
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            verbose: false,
        }
    }

    /// Load config from environment variables
    ///
    /// - `SEQANNO_OUTPUT_DIR`: directory for report files
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(dir) = std::env::var("SEQANNO_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        config
    }

    /// Set the output directory
    pub fn set_output_dir(&mut self, dir: PathBuf) {
        self.output_dir = dir;
    }

    /// Enable verbose output
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
