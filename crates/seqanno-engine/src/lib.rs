//! Annotation engine for structural-biology archive records.
//!
//! The engine derives two families of computed content for an entry record:
//!
//! - **Reference-sequence alignments**: which external database accessions
//!   each biological entity corresponds to, over which residue ranges, and
//!   under which provenance authority, reconciling the alignments embedded in
//!   the deposition with an external curated chain mapping ([`align`]).
//! - **Organism assignments**: per-entity source and host organisms with
//!   canonical taxonomy identifiers and full ancestor lineages ([`organism`],
//!   [`taxonomy`]).
//!
//! [`annotate::Annotator`] is the entry point; it is a pure function of the
//! record plus read-only injected resources, so callers may process records
//! in parallel at record granularity with no coordination.

pub mod align;
pub mod annotate;
pub mod organism;
pub mod record;
pub mod taxonomy;

// Re-export the public surface
pub use annotate::{AnnotationReport, Annotator, EngineOptions};
pub use record::EntryRecord;
