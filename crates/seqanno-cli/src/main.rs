//! Seqanno - structural entry record annotation tool

use anyhow::Result;
use clap::Parser;
use seqanno_cli::{commands, Cli, Commands, Config};
use seqanno_common::logging::{init_logging, LogConfig, LogLevel};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment configures logging; the verbose flag forces debug level.
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    log_config.log_file_prefix = "seqanno".to_string();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config)?;

    match cli.command {
        Commands::Annotate {
            records,
            taxonomy,
            mapping,
            use_external_alignments,
            output,
            pretty,
        } => {
            let output = output.unwrap_or_else(|| Config::from_env().output_dir);
            commands::annotate::execute(
                &records,
                &taxonomy,
                mapping.as_deref(),
                use_external_alignments,
                &output,
                pretty,
            )?;
        },
        Commands::Taxon { taxon_id, taxonomy } => {
            commands::taxon::execute(taxon_id, &taxonomy)?;
        },
    }

    Ok(())
}
