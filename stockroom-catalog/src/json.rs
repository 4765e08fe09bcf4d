//! JSON snapshot persistence.
//!
//! A snapshot is a pretty-printed JSON array with one object per record.
//! Loading never fails on bad content: a missing file is an empty
//! collection, unparsable content is an empty collection with a warning,
//! and individual entries that do not match the schema are quarantined
//! rather than aborting the whole load. [`recover_snapshot`] also moves
//! whatever did not load out of the way before the caller saves.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PersistenceError;
use crate::types::Validate;

/// How the snapshot file was found at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// No file at the path; start with an empty collection.
    Missing,
    /// The file exists but is not a JSON array.
    Unreadable(String),
}

/// An entry rejected at load time, kept verbatim for later repair.
#[derive(Debug, Clone, Serialize)]
pub struct Quarantined {
    /// Position in the snapshot array.
    pub index: usize,
    pub reason: String,
    pub entry: serde_json::Value,
}

/// Result of [`load_snapshot`].
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub records: Vec<T>,
    pub quarantined: Vec<Quarantined>,
    pub status: LoadStatus,
}

impl<T> Snapshot<T> {
    fn empty(status: LoadStatus) -> Self {
        Self {
            records: Vec::new(),
            quarantined: Vec::new(),
            status,
        }
    }
}

/// Load a snapshot file, validating each entry.
///
/// The file is parsed from raw bytes, so content that is not valid UTF-8 is
/// reported as [`LoadStatus::Unreadable`] like any other parse failure. Only
/// I/O failures other than "not found" are returned as errors.
pub fn load_snapshot<T>(path: &Path) -> Result<Snapshot<T>, PersistenceError>
where
    T: DeserializeOwned + Validate,
{
    let contents = match std::fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No snapshot at {}, starting empty", path.display());
            return Ok(Snapshot::empty(LoadStatus::Missing));
        }
        Err(e) => {
            return Err(PersistenceError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }
    };

    if contents.iter().all(u8::is_ascii_whitespace) {
        return Ok(Snapshot::empty(LoadStatus::Loaded));
    }

    let entries = match serde_json::from_slice::<serde_json::Value>(&contents) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            log::warn!("{} is not a JSON array, ignoring its contents", path.display());
            return Ok(Snapshot::empty(LoadStatus::Unreadable(
                "top-level value is not an array".to_string(),
            )));
        }
        Err(e) => {
            log::warn!("Could not parse {}: {e}", path.display());
            return Ok(Snapshot::empty(LoadStatus::Unreadable(e.to_string())));
        }
    };

    let mut snapshot = Snapshot::empty(LoadStatus::Loaded);
    for (index, entry) in entries.into_iter().enumerate() {
        let checked = T::deserialize(&entry)
            .map_err(|e| e.to_string())
            .and_then(|record| record.validate().map(|_| record).map_err(|e| e.to_string()));
        match checked {
            Ok(record) => snapshot.records.push(record),
            Err(reason) => {
                log::warn!("Quarantining entry {index} of {}: {reason}", path.display());
                snapshot.quarantined.push(Quarantined {
                    index,
                    reason,
                    entry,
                });
            }
        }
    }

    Ok(snapshot)
}

/// Load a snapshot and set aside everything that did not load, so that a
/// later [`save_snapshot`] to `path` cannot destroy data.
///
/// An unreadable file (including one that cannot be read at all) is moved
/// to `<name>.corrupt` and an empty snapshot is returned. Quarantined
/// entries are appended to `<name>.rejected.json`. If the data cannot be
/// set aside, the error is returned and the caller must not save.
pub fn recover_snapshot<T>(path: &Path) -> Result<Snapshot<T>, PersistenceError>
where
    T: DeserializeOwned + Validate,
{
    let snapshot = match load_snapshot::<T>(path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("{e}");
            let backup = backup_unreadable(path).map_err(|_| e)?;
            log::warn!("Moved {} aside to {}", path.display(), backup.display());
            return Ok(Snapshot::empty(LoadStatus::Unreadable(format!(
                "file could not be read, moved to {}",
                backup.display()
            ))));
        }
    };

    if let LoadStatus::Unreadable(_) = &snapshot.status {
        let backup = backup_unreadable(path)?;
        log::warn!("Moved {} aside to {}", path.display(), backup.display());
    }

    if let Some(rejected) = save_quarantine(path, &snapshot.quarantined)? {
        log::warn!(
            "{} malformed entries of {} saved to {}",
            snapshot.quarantined.len(),
            path.display(),
            rejected.display(),
        );
    }

    Ok(snapshot)
}

/// Write records as a pretty-printed JSON array, replacing `path` atomically.
pub fn save_snapshot<'a, T>(
    path: &Path,
    records: impl IntoIterator<Item = &'a T>,
) -> Result<(), PersistenceError>
where
    T: Serialize + 'a,
{
    let records: Vec<&T> = records.into_iter().collect();
    write_pretty(path, &records)
}

/// Path where quarantined entries of `snapshot_path` are written.
pub fn quarantine_path(snapshot_path: &Path) -> PathBuf {
    snapshot_path.with_extension("rejected.json")
}

/// Append quarantined entries to the file next to the snapshot. No-op when
/// empty.
///
/// Entries already in the file are kept; an entry whose raw JSON is already
/// there is not added twice. Returns the path of the file, if any.
pub fn save_quarantine(
    snapshot_path: &Path,
    entries: &[Quarantined],
) -> Result<Option<PathBuf>, PersistenceError> {
    if entries.is_empty() {
        return Ok(None);
    }
    let path = quarantine_path(snapshot_path);
    let json_err = |source: serde_json::Error| PersistenceError::Json {
        path: path.display().to_string(),
        source,
    };

    let mut merged: Vec<serde_json::Value> = match std::fs::read(&path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(serde_json::Value::Array(existing)) => existing,
            Ok(other) => vec![other],
            Err(e) => {
                log::warn!("Could not parse {}: {e}", path.display());
                let backup = backup_unreadable(&path)?;
                log::warn!("Moved it aside to {}", backup.display());
                Vec::new()
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            return Err(PersistenceError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }
    };

    let before = merged.len();
    for entry in entries {
        if merged.iter().any(|v| v.get("entry") == Some(&entry.entry)) {
            continue;
        }
        merged.push(serde_json::to_value(entry).map_err(json_err)?);
    }
    if merged.len() > before {
        write_pretty(&path, &merged)?;
    }
    Ok(Some(path))
}

/// Move an unreadable snapshot aside so the next save does not clobber it.
///
/// The first backup is `<name>.corrupt`; later ones get a number
/// (`<name>.1.corrupt`) so an earlier backup is never replaced.
pub fn backup_unreadable(path: &Path) -> Result<PathBuf, PersistenceError> {
    let mut backup = path.with_extension("corrupt");
    let mut n = 1;
    while backup.exists() {
        backup = path.with_extension(format!("{n}.corrupt"));
        n += 1;
    }
    std::fs::rename(path, &backup).map_err(|e| PersistenceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(backup)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let io_err = |source: io::Error| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| PersistenceError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
    buf.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &buf).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
