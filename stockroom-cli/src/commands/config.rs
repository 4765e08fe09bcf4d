use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::{Backend, ConfigAction};
use crate::settings::{self, Settings};

/// Flags given on the command line that take part in value resolution.
pub(crate) struct Overrides<'a> {
    pub data_dir: Option<&'a Path>,
    pub backend: Option<Backend>,
}

pub(crate) fn run_config(
    action: ConfigAction,
    settings: &Settings,
    overrides: Overrides<'_>,
) -> Result<(), CliError> {
    let path = settings::settings_path();
    match action {
        ConfigAction::Show => {
            run_config_show(&path, settings, &overrides);
            Ok(())
        }
        ConfigAction::Path => {
            log::info!("{}", path.display());
            Ok(())
        }
        ConfigAction::SetDataDir { path: dir, clear } => {
            let dir = if clear { None } else { dir };
            run_set_data_dir(&path, dir)
        }
    }
}

/// Show resolved settings and where each value came from.
fn run_config_show(path: &Path, settings: &Settings, overrides: &Overrides<'_>) {
    log::info!(
        "{}",
        "Stockroom Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    let status = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!(
        "  Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );
    crate::log_blank();

    let data_source = if overrides.data_dir.is_some() {
        "--data-dir"
    } else if settings.storage.data_dir.is_some() {
        "settings file"
    } else {
        "current directory"
    };
    let data_dir = settings.resolve_data_dir(overrides.data_dir.map(Path::to_path_buf));
    show_value("data_dir", &data_dir.display().to_string(), data_source);

    let backend_source = if overrides.backend.is_some() {
        "--backend"
    } else {
        "settings file or default"
    };
    let backend = settings.resolve_backend(overrides.backend);
    show_value("backend", backend.as_str(), backend_source);
    show_value("grades.scale", &settings.grades.scale, "settings file or default");

    if let Some(raw) = settings::load_settings_string(path) {
        crate::log_blank();
        log::info!("{}", "Raw file:".if_supports_color(Stdout, |t| t.dimmed()));
        for line in raw.lines() {
            log::info!("  {line}");
        }
    }
}

fn show_value(name: &str, value: &str, source: &str) {
    log::info!(
        "  {:<14} {} {}",
        name,
        value,
        format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
    );
}

fn run_set_data_dir(settings_file: &Path, dir: Option<PathBuf>) -> Result<(), CliError> {
    let dir = match dir {
        Some(d) if d.is_relative() => Some(std::env::current_dir()?.join(d)),
        other => other,
    };
    settings::save_data_dir(settings_file, dir.as_deref())
        .map_err(|e| CliError::config(format!("Failed to write {}: {e}", settings_file.display())))?;

    match dir {
        Some(d) => {
            if !d.is_dir() {
                log::warn!("{} does not exist yet; it will be created on first save", d.display());
            }
            log::info!(
                "{} {}",
                "Data directory set to".if_supports_color(Stdout, |t| t.green()),
                d.display(),
            );
        }
        None => log::info!("Saved data directory cleared."),
    }
    Ok(())
}
