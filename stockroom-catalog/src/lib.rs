//! Catalog data model, consistency engine, and flat-file persistence.
//!
//! This crate owns the in-memory record collection ([`CatalogStore`]) for
//! both record kinds (books and stock items), the identity key used to
//! detect duplicates, JSON snapshot I/O, the legacy inventory importer, and
//! the grade roster. It has no database dependencies; `stockroom-db` layers
//! SQLite persistence on top of these types.

pub mod error;
pub mod json;
pub mod key;
pub mod legacy;
pub mod roster;
pub mod store;
pub mod types;

pub use error::{CatalogError, PersistenceError};
pub use json::{
    LoadStatus, Quarantined, Snapshot, load_snapshot, recover_snapshot, save_quarantine,
    save_snapshot,
};
pub use key::{identity_key, normalize};
pub use legacy::{LegacyImport, parse_legacy_inventory, read_legacy_inventory};
pub use roster::{CleanedScores, GradeScale, ReportRow, Roster, Standing, Student, clean_scores};
pub use store::{CatalogStore, Upserted};
pub use types::*;
