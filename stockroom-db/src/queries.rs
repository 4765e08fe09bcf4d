//! Read queries for the catalog database.

use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use stockroom_catalog::{Book, Item, RecordId};

use crate::operations::OperationError;

const BOOK_COLUMNS: &str = "id, name, category, author, publisher, pages, quantity";
const ITEM_COLUMNS: &str = "id, name, category, unit_price, quantity";

/// All books in saved order.
pub fn load_books(conn: &Connection) -> Result<Vec<Book>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOK_COLUMNS} FROM books ORDER BY position"
    ))?;
    let rows = stmt.query_map([], row_to_book)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// All items in saved order.
pub fn load_items(conn: &Connection) -> Result<Vec<Item>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items ORDER BY position"
    ))?;
    let rows = stmt.query_map([], row_to_item)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// First book (in saved order) whose trimmed name matches, ignoring ASCII case.
pub fn find_book_by_name(conn: &Connection, name: &str) -> Result<Option<Book>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOK_COLUMNS} FROM books
         WHERE TRIM(name) = TRIM(?1) COLLATE NOCASE
         ORDER BY position LIMIT 1"
    ))?;
    let mut rows = stmt.query_map(params![name], row_to_book)?;
    rows.next().transpose().map_err(Into::into)
}

/// First item (in saved order) whose trimmed name matches, ignoring ASCII case.
pub fn find_item_by_name(conn: &Connection, name: &str) -> Result<Option<Item>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items
         WHERE TRIM(name) = TRIM(?1) COLLATE NOCASE
         ORDER BY position LIMIT 1"
    ))?;
    let mut rows = stmt.query_map(params![name], row_to_item)?;
    rows.next().transpose().map_err(Into::into)
}

fn record_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<RecordId> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn quantity(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn row_to_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        author: row.get(3)?,
        publisher: row.get(4)?,
        pages: row.get(5)?,
        quantity: quantity(row, 6)?,
    })
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        unit_price: row.get(3)?,
        quantity: quantity(row, 4)?,
    })
}
