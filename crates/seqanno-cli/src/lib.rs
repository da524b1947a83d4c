//! Seqanno CLI library
//!
//! Command-line interface for annotating structural-biology entry records:
//!
//! - **Annotation**: derive reference-sequence alignments and organism
//!   assignments for record files (`seqanno annotate`)
//! - **Taxonomy lookup**: resolve one identifier against the taxonomy
//!   resource for operator debugging (`seqanno taxon`)

pub mod commands;
pub mod config;

pub use config::Config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Seqanno - structural entry record annotation
#[derive(Parser, Debug)]
#[command(name = "seqanno")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate entry record files
    Annotate {
        /// Record files to process (.json, optionally gzip-compressed)
        #[arg(required = true)]
        records: Vec<PathBuf>,

        /// Taxonomy resource directory (nodes.dmp, names.dmp, merged.dmp)
        #[arg(short, long, env = "SEQANNO_TAXONOMY_DIR")]
        taxonomy: PathBuf,

        /// Chain mapping summary file (JSON)
        #[arg(short, long, env = "SEQANNO_MAPPING_FILE")]
        mapping: Option<PathBuf>,

        /// Override embedded alignments wherever the chain mapping covers an entity
        #[arg(long)]
        use_external_alignments: bool,

        /// Output directory for report files (defaults to config or ./annotations)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print report JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Resolve one taxonomy identifier and print its names and lineage
    Taxon {
        /// Raw taxonomy identifier (merged identifiers are canonicalized)
        taxon_id: u32,

        /// Taxonomy resource directory (nodes.dmp, names.dmp, merged.dmp)
        #[arg(short, long, env = "SEQANNO_TAXONOMY_DIR")]
        taxonomy: PathBuf,
    },
}
