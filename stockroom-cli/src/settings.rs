//! Saved settings (data directory, backend, grade scale).
//!
//! The settings file is `~/.config/stockroom/settings.toml`. Every value
//! resolves through the same chain: CLI flag, then the settings file, then
//! a built-in default.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stockroom_catalog::GradeScale;

use crate::cli_types::Backend;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub storage: StorageSettings,
    pub grades: GradeSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StorageSettings {
    pub data_dir: Option<PathBuf>,
    pub backend: Backend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GradeSettings {
    pub scale: String,
}

impl Default for GradeSettings {
    fn default() -> Self {
        Self {
            scale: "percent".to_string(),
        }
    }
}

/// Canonical path to the settings file: `~/.config/stockroom/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("stockroom").join("settings.toml")
}

/// Load settings, falling back to defaults if the file is missing or invalid.
pub(crate) fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub(crate) fn load_settings_from(path: &Path) -> Settings {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Settings::default();
    };
    match toml::from_str(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring invalid settings file {}: {e}", path.display());
            Settings::default()
        }
    }
}

impl Settings {
    /// Resolve the data directory:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. Saved `storage.data_dir`
    /// 3. Current working directory
    pub(crate) fn resolve_data_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        if let Some(p) = cli_override {
            return p;
        }
        if let Some(p) = self
            .storage
            .data_dir
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            return p.clone();
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    pub(crate) fn resolve_backend(&self, cli_override: Option<Backend>) -> Backend {
        cli_override.unwrap_or(self.storage.backend)
    }

    /// Grade scale from the CLI or the settings file; an unknown saved
    /// value falls back to the percent scale with a warning.
    pub(crate) fn resolve_scale(&self, cli_override: Option<GradeScale>) -> GradeScale {
        if let Some(scale) = cli_override {
            return scale;
        }
        self.grades.scale.parse().unwrap_or_else(|e| {
            log::warn!("{e}; using the percent scale");
            GradeScale::PERCENT
        })
    }
}

/// Save (or clear) the data directory in the settings file.
///
/// Uses `toml::Value` for a surgical update so unrelated keys are preserved.
pub(crate) fn save_data_dir(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let storage = table
        .entry("storage")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let storage_table = storage
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[storage] is not a table"))?;

    match path {
        Some(p) => {
            storage_table.insert(
                "data_dir".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            storage_table.remove("data_dir");
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
