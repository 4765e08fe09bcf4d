//! Write operations: replace a whole collection in one transaction.

use rusqlite::{Connection, params};
use stockroom_catalog::{Book, Item};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Quantity of '{name}' does not fit in a database integer: {quantity}")]
    QuantityOutOfRange { name: String, quantity: u64 },
}

fn db_quantity(name: &str, quantity: u64) -> Result<i64, OperationError> {
    i64::try_from(quantity).map_err(|_| OperationError::QuantityOutOfRange {
        name: name.to_string(),
        quantity,
    })
}

/// Replace the stored book collection with `books`, keeping their order.
pub fn save_books<'a>(
    conn: &Connection,
    books: impl IntoIterator<Item = &'a Book>,
) -> Result<usize, OperationError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM books", [])?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO books (id, position, name, category, author, publisher, pages, quantity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for (position, book) in books.into_iter().enumerate() {
            stmt.execute(params![
                book.id.to_string(),
                position as i64,
                book.name,
                book.category,
                book.author,
                book.publisher,
                book.pages,
                db_quantity(&book.name, book.quantity)?,
            ])?;
            written += 1;
        }
    }
    tx.commit()?;
    Ok(written)
}

/// Replace the stored item collection with `items`, keeping their order.
pub fn save_items<'a>(
    conn: &Connection,
    items: impl IntoIterator<Item = &'a Item>,
) -> Result<usize, OperationError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM items", [])?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO items (id, position, name, category, unit_price, quantity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (position, item) in items.into_iter().enumerate() {
            stmt.execute(params![
                item.id.to_string(),
                position as i64,
                item.name,
                item.category,
                item.unit_price,
                db_quantity(&item.name, item.quantity)?,
            ])?;
            written += 1;
        }
    }
    tx.commit()?;
    Ok(written)
}
