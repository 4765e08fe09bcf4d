//! SQLite persistence backend for the catalog.
//!
//! Stores books and stock items in an SQLite file (via rusqlite with the
//! bundled feature) as an alternative to JSON snapshots. Whole collections
//! are written in one transaction and read back in their saved order.

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{OperationError, save_books, save_items};
pub use queries::{find_book_by_name, find_item_by_name, load_books, load_items};
pub use schema::{SchemaError, open_database, open_memory};
