//! stockroom CLI
//!
//! Command-line interface for a book catalog, a stock inventory and a
//! grade roster kept as JSON snapshots or in an SQLite database.

mod cli_types;
mod commands;
mod display;
mod error;
mod logging;
mod settings;
mod storage;

use clap::Parser;
use stockroom_catalog::{Book, Item};

use cli_types::{Cli, Commands, ShellKind};
use commands::books::run_books;
use commands::config::{Overrides, run_config};
use commands::grades::run_grades;
use commands::items::run_items;
use commands::shell::run_shell;
use commands::stats::run_stats;
use storage::Storage;

pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = settings::load_settings();
    let data_dir = cli.data_dir;
    let backend = cli.backend;
    let storage = || {
        let dir = settings.resolve_data_dir(data_dir.clone());
        let backend = settings.resolve_backend(backend);
        log::debug!("Data directory {} ({})", dir.display(), backend.as_str());
        Storage::new(dir, backend)
    };

    match cli.command {
        Commands::Books { action } => run_books(&storage(), action),
        Commands::Items { action } => run_items(&storage(), action),
        Commands::Shell { kind } => match kind {
            ShellKind::Books => run_shell::<Book>(&storage()),
            ShellKind::Items => run_shell::<Item>(&storage()),
        },
        Commands::Stats => run_stats(&storage()),
        Commands::Grades { action } => run_grades(&storage().data_dir, &settings, action),
        Commands::Config { action } => {
            let overrides = Overrides {
                data_dir: data_dir.as_deref(),
                backend,
            };
            run_config(action, &settings, overrides)
        }
    }
}
