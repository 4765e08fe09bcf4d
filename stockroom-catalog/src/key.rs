//! Identity keys used to detect duplicate records.
//!
//! Each record kind has exactly one key shape: books are keyed by
//! `name|publisher`, stock items by `name` alone. Deduplication, upsert and
//! exact lookup all go through [`normalize`], so they agree by construction.

use crate::types::Record;

/// Trim surrounding whitespace and lowercase.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The normalized identity key of a record.
pub fn identity_key<R: Record>(record: &R) -> String {
    record.identity_key()
}

/// Normalize each key part and join them with `|`.
pub(crate) fn composite(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| normalize(p))
        .collect::<Vec<_>>()
        .join("|")
}
