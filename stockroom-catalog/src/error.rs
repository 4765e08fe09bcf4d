//! Error types for catalog operations and snapshot persistence.
//!
//! Every variant is recoverable at the call site: a failed operation leaves
//! the store exactly as it was before the call.

use thiserror::Error;

/// Errors returned by [`CatalogStore`](crate::CatalogStore) operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field was empty or a numeric field was out of range.
    #[error("Invalid record: {0}")]
    Validation(String),

    /// A stock change would have left the quantity below zero.
    #[error("Insufficient stock for '{name}': {available} available, change of {change} rejected")]
    InsufficientStock {
        name: String,
        available: u64,
        change: i64,
    },

    /// No record matched the lookup, or the id is no longer in the store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A restock would overflow the quantity counter.
    #[error("Quantity overflow for '{0}'")]
    QuantityOverflow(String),
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Errors reading or writing snapshot files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Malformed legacy inventory {path}: {source}")]
    Legacy { path: String, source: csv::Error },
}
