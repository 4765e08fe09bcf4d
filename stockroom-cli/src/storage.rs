//! Loading and saving collections through the configured backend.
//!
//! An unreadable JSON snapshot is moved aside and the collection starts
//! empty. Malformed entries are quarantined next to the snapshot. If either
//! cannot be set aside, opening fails so the next save cannot overwrite
//! them. The dedup pass runs before any command sees the store.

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use stockroom_catalog::{
    Book, CatalogStore, Item, LoadStatus, Record, recover_snapshot, save_snapshot,
};
use stockroom_db::OperationError;

use crate::CliError;
use crate::cli_types::Backend;

/// SQLite file name inside the data directory.
pub(crate) const DB_FILE: &str = "stockroom.db";

/// Record kinds that both backends can persist.
pub(crate) trait Persisted: Record {
    fn load_db(conn: &Connection) -> Result<Vec<Self>, OperationError>;
    fn save_db(conn: &Connection, records: Vec<&Self>) -> Result<usize, OperationError>;
}

impl Persisted for Book {
    fn load_db(conn: &Connection) -> Result<Vec<Self>, OperationError> {
        stockroom_db::load_books(conn)
    }

    fn save_db(conn: &Connection, records: Vec<&Self>) -> Result<usize, OperationError> {
        stockroom_db::save_books(conn, records)
    }
}

impl Persisted for Item {
    fn load_db(conn: &Connection) -> Result<Vec<Self>, OperationError> {
        stockroom_db::load_items(conn)
    }

    fn save_db(conn: &Connection, records: Vec<&Self>) -> Result<usize, OperationError> {
        stockroom_db::save_items(conn, records)
    }
}

/// Resolved storage location for this run.
#[derive(Debug, Clone)]
pub(crate) struct Storage {
    pub data_dir: PathBuf,
    pub backend: Backend,
}

impl Storage {
    pub(crate) fn new(data_dir: PathBuf, backend: Backend) -> Self {
        Self { data_dir, backend }
    }

    /// Path of the file holding collection `R`.
    pub(crate) fn location<R: Record>(&self) -> PathBuf {
        match self.backend {
            Backend::Json => self.data_dir.join(R::KIND.file_name),
            Backend::Sqlite => self.data_dir.join(DB_FILE),
        }
    }

    /// Load collection `R` and merge any duplicates, saving if anything merged.
    pub(crate) fn open<R: Persisted>(&self) -> Result<CatalogStore<R>, CliError> {
        let mut store = self.load::<R>()?;
        let merged = store.deduplicate_and_merge();
        if merged > 0 {
            log::info!(
                "{}",
                format!("Cleanup: {merged} duplicate {} merged.", R::KIND.plural)
                    .if_supports_color(Stdout, |t| t.green()),
            );
            self.save(&store)?;
        }
        Ok(store)
    }

    /// Load collection `R` as stored, without the dedup pass.
    ///
    /// Fails only when the stored data could not be set aside, in which case
    /// nothing may be saved over it.
    pub(crate) fn load<R: Persisted>(&self) -> Result<CatalogStore<R>, CliError> {
        let records = match self.backend {
            Backend::Json => self.load_json::<R>()?,
            Backend::Sqlite => self.load_sqlite::<R>()?,
        };
        log::debug!(
            "Loaded {} {} from {}",
            records.len(),
            R::KIND.plural,
            self.location::<R>().display(),
        );
        Ok(CatalogStore::from_records(records))
    }

    /// Write the whole collection back.
    pub(crate) fn save<R: Persisted>(&self, store: &CatalogStore<R>) -> Result<(), CliError> {
        let path = self.location::<R>();
        match self.backend {
            Backend::Json => save_snapshot(&path, store.records())?,
            Backend::Sqlite => {
                let conn = open_db(&path)?;
                R::save_db(&conn, store.records().collect()).map_err(|e| {
                    CliError::database(format!("Failed to save {}: {e}", R::KIND.plural))
                })?;
            }
        }
        log::debug!("Saved {} {} to {}", store.len(), R::KIND.plural, path.display());
        Ok(())
    }

    fn load_json<R: Persisted>(&self) -> Result<Vec<R>, CliError> {
        let path = self.location::<R>();
        let snapshot = recover_snapshot::<R>(&path)?;
        match &snapshot.status {
            LoadStatus::Loaded => {}
            LoadStatus::Missing => {
                log::debug!("{} not found, starting empty", path.display());
            }
            LoadStatus::Unreadable(reason) => {
                log::warn!("Could not read {}: {reason}", path.display());
                log::warn!("Starting with an empty {} collection.", R::KIND.noun);
            }
        }
        if !snapshot.quarantined.is_empty() {
            log::warn!(
                "{} malformed {} skipped",
                snapshot.quarantined.len(),
                R::KIND.plural,
            );
        }
        Ok(snapshot.records)
    }

    /// A database that exists but cannot be read is an error; starting empty
    /// would replace every table on the next save.
    fn load_sqlite<R: Persisted>(&self) -> Result<Vec<R>, CliError> {
        let path = self.location::<R>();
        if !path.exists() {
            log::debug!("{} not found, starting empty", path.display());
            return Ok(Vec::new());
        }
        let conn = open_db(&path)?;
        R::load_db(&conn)
            .map_err(|e| CliError::database(format!("Failed to load {}: {e}", R::KIND.plural)))
    }
}

fn open_db(path: &Path) -> Result<Connection, CliError> {
    stockroom_db::open_database(path).map_err(|e| {
        CliError::database(format!("Failed to open {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn open_merges_and_persists_duplicates() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Json);
        let path = storage.location::<Book>();
        fs::write(
            &path,
            r#"[
    {"nombre": "Dune", "editorial": "Ace", "paginas": 412, "cantidad": 3},
    {"nombre": "dune ", "editorial": "ACE", "paginas": 500, "cantidad": 7}
]"#,
        )
        .unwrap();

        let store = storage.open::<Book>().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_quantity(), 10);

        let reloaded = storage.load::<Book>().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records().next().unwrap().pages, 412);
    }

    #[test]
    fn unreadable_snapshot_is_moved_aside() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Json);
        let path = storage.location::<Item>();
        fs::write(&path, "not json at all").unwrap();

        let store = storage.open::<Item>().unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());
        assert!(tmp.path().join("inventario.corrupt").exists());
    }

    #[test]
    fn quarantined_entries_are_written_out() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Json);
        fs::write(
            storage.location::<Item>(),
            r#"[{"nombre": "Widget", "precio": 1.0, "cantidad": 1}, {"nombre": "Bad", "cantidad": -1}]"#,
        )
        .unwrap();

        let store = storage.open::<Item>().unwrap();
        assert_eq!(store.len(), 1);
        assert!(tmp.path().join("inventario.rejected.json").exists());
    }

    #[test]
    fn non_utf8_snapshot_survives_a_save() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Json);
        let path = storage.location::<Item>();
        let original = b"[{\"nombre\": \"Ca\xF1a\", \"precio\": 1.0, \"cantidad\": 50}]";
        fs::write(&path, original).unwrap();

        let mut store = storage.open::<Item>().unwrap();
        assert!(store.is_empty());
        store.upsert(Item::new("Widget", "", 1.0, 1)).unwrap();
        storage.save(&store).unwrap();

        let backup = tmp.path().join("inventario.corrupt");
        assert_eq!(fs::read(&backup).unwrap(), original);
        assert_eq!(storage.load::<Item>().unwrap().len(), 1);
    }

    #[test]
    fn unopenable_database_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Sqlite);
        let path = storage.location::<Item>();
        fs::write(&path, "this is not a database file at all, just some text").unwrap();

        assert!(storage.open::<Item>().is_err());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "this is not a database file at all, just some text",
        );
    }

    #[test]
    fn sqlite_backend_round_trips() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Sqlite);
        assert!(storage.open::<Item>().unwrap().is_empty());

        let mut store = CatalogStore::new();
        store.upsert(Item::new("Widget", "tools", 2.5, 4)).unwrap();
        storage.save(&store).unwrap();

        let reloaded = storage.open::<Item>().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.total_quantity(), 4);
        assert!(tmp.path().join(DB_FILE).exists());
    }
}
