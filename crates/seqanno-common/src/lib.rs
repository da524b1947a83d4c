//! Shared infrastructure for the seqanno workspace.
//!
//! This crate carries the pieces every other seqanno crate needs:
//!
//! - **Error handling**: [`error::AnnoError`] and the [`error::Result`] alias
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//! - **Text utilities**: small helpers for the delimited, case-messy fields
//!   found in deposited archive records

pub mod error;
pub mod logging;
pub mod text;

// Re-export commonly used types
pub use error::{AnnoError, Result};
