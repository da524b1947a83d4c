//! Text utilities for deposited archive fields
//!
//! Deposited records carry comma-delimited multi-value fields with uneven
//! casing and stray whitespace. These helpers normalize them without losing
//! the depositor's original spelling.

/// Drop case-insensitive duplicates, keeping the first-seen casing.
///
/// `["Human", "human", "HUMAN", "Mouse"]` becomes `["Human", "Mouse"]`.
/// The lookup is keyed on the uppercased form; the original string is what
/// gets emitted.
pub fn dedup_case_insensitive<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value = value.as_ref();
        if seen.insert(value.to_uppercase()) {
            out.push(value.to_string());
        }
    }
    out
}

/// Remove all whitespace from a value.
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split a delimited field into trimmed parts.
///
/// Empty input yields a single empty part, mirroring how a blank archive
/// field still occupies one slot in a parallel list.
pub fn split_delimited(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(|part| part.trim().to_string())
        .collect()
}

/// True when an archive field carries no usable value.
///
/// The archive uses `.` and `?` as null placeholders.
pub fn is_placeholder(value: &str) -> bool {
    matches!(value.trim(), "" | "." | "?")
}
