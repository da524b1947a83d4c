//! Batch record annotation
//!
//! Loads the reference resources once, then walks the record files with a
//! progress bar. A record that fails to load or parse is logged and skipped;
//! it never aborts the batch. One report JSON is written per record plus a
//! run summary for the whole batch.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use seqanno_engine::align::{ChainAlignmentSource, ChainMappingSummary};
use seqanno_engine::taxonomy::TaxonomyStore;
use seqanno_engine::{Annotator, EngineOptions, EntryRecord};

/// Outcome of one batch run, written alongside the reports
#[derive(Debug, Serialize)]
struct RunSummary {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    records_processed: usize,
    records_failed: usize,
}

/// Run the annotate command
pub fn execute(
    records: &[PathBuf],
    taxonomy_dir: &Path,
    mapping: Option<&Path>,
    use_external_alignments: bool,
    output_dir: &Path,
    pretty: bool,
) -> Result<()> {
    let started_at = Utc::now();

    let taxonomy = TaxonomyStore::load_dir(taxonomy_dir)
        .with_context(|| format!("Failed to load taxonomy from {}", taxonomy_dir.display()))?;

    let external: Option<Arc<dyn ChainAlignmentSource + Send + Sync>> = match mapping {
        Some(path) => {
            let summary = ChainMappingSummary::load(path)
                .with_context(|| format!("Failed to load chain mapping from {}", path.display()))?;
            Some(Arc::new(summary))
        },
        None => None,
    };

    if use_external_alignments && external.is_none() {
        warn!("--use-external-alignments requested without --mapping; embedded alignments will be kept");
    }

    let annotator = Annotator::new(
        EngineOptions {
            use_external_alignments,
        },
        Arc::new(taxonomy),
        external,
    );

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut processed = 0usize;
    let mut failed = 0usize;
    for path in records {
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match annotate_one(&annotator, path, output_dir, pretty) {
            Ok(entry_id) => {
                processed += 1;
                info!("Annotated {} from {}", entry_id, path.display());
            },
            Err(e) => {
                failed += 1;
                warn!("Skipping {}: {:#}", path.display(), e);
            },
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} annotated, {} failed", processed, failed));

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        records_processed: processed,
        records_failed: failed,
    };
    let summary_path = output_dir.join("run-summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    info!(
        "Annotation run complete: {} records, {} failed, reports in {}",
        processed,
        failed,
        output_dir.display()
    );
    Ok(())
}

/// Annotate a single record file and write its report.
fn annotate_one(
    annotator: &Annotator,
    path: &Path,
    output_dir: &Path,
    pretty: bool,
) -> Result<String> {
    let record = load_record(path)?;
    let report = annotator.annotate(&record);

    let out_path = output_dir.join(format!("{}.json", record.entry_id));
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    std::fs::write(&out_path, json)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    Ok(record.entry_id)
}

/// Read a record document, transparently decompressing `.gz` files.
fn load_record(path: &Path) -> Result<EntryRecord> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut content = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file)
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to decompress {}", path.display()))?;
    } else {
        let mut file = file;
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record {}", path.display()))
}
