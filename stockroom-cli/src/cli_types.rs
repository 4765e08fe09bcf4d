//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use stockroom_catalog::{Field, GradeScale};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Manage a book catalog, a stock inventory and a grade roster", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the data files (defaults to the saved setting, then the current directory)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend (defaults to the saved setting, then json)
    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where collections are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Backend {
    /// One pretty-printed JSON file per collection
    #[default]
    Json,
    /// A single SQLite database
    Sqlite,
}

impl Backend {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage the book catalog
    Books {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Manage the stock inventory
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Run the interactive menu over one collection
    Shell {
        #[arg(value_enum)]
        kind: ShellKind,
    },

    /// Show record and unit counts for every collection
    Stats,

    /// Track student grades
    Grades {
        #[command(subcommand)]
        action: GradeAction,
    },

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ShellKind {
    Books,
    Items,
}

/// Signed stock change or absolute stock level; exactly one is required.
#[derive(Args, Clone, Debug)]
#[command(group(ArgGroup::new("change").required(true).args(["add", "set"])))]
pub(crate) struct StockChange {
    /// Units to add (positive) or take out (negative)
    #[arg(long, allow_negative_numbers = true)]
    pub add: Option<i64>,

    /// Set the stock to exactly this many units
    #[arg(long, allow_negative_numbers = true)]
    pub set: Option<i64>,
}

#[derive(Args, Clone, Debug)]
pub(crate) struct SearchArgs {
    /// Text to look for (case-insensitive substring)
    pub term: String,

    /// Field to search: name, category, author or publisher
    #[arg(long, default_value = "name")]
    pub by: Field,
}

#[derive(Subcommand)]
pub(crate) enum BookAction {
    /// Register a book, or restock it if the same title and publisher exist
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long)]
        publisher: String,
        #[arg(long)]
        pages: u32,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// List the whole catalog
    List,

    /// Filter books by a field
    Search(SearchArgs),

    /// Change the stock of a book
    Stock {
        /// Exact title
        name: String,
        /// Exact publisher
        #[arg(long)]
        publisher: String,
        #[command(flatten)]
        change: StockChange,
    },

    /// Delete a book
    Remove {
        /// Exact title
        name: String,
        /// Exact publisher
        #[arg(long)]
        publisher: String,
        /// Actually delete (otherwise only shows what would be removed)
        #[arg(long)]
        confirm: bool,
    },

    /// Merge duplicate entries and report what was folded
    Dedup,
}

#[derive(Subcommand)]
pub(crate) enum ItemAction {
    /// Register an item, or restock it if the name exists
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// List the whole inventory
    List,

    /// Filter items by a field
    Search(SearchArgs),

    /// Change the stock of an item
    Stock {
        /// Exact item name
        name: String,
        #[command(flatten)]
        change: StockChange,
    },

    /// Delete an item
    Remove {
        /// Exact item name
        name: String,
        /// Actually delete (otherwise only shows what would be removed)
        #[arg(long)]
        confirm: bool,
    },

    /// Merge duplicate entries and report what was folded
    Dedup,

    /// Import a legacy `name,price,quantity` text file into the inventory
    ImportLegacy {
        /// Path to the legacy text file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub(crate) enum GradeAction {
    /// Record scores for a student (appends if the student exists)
    Add {
        name: String,
        #[arg(required = true, allow_negative_numbers = true)]
        scores: Vec<f64>,
        /// Grade scale: percent (pass at 60) or five-point (pass at 3.0)
        #[arg(long)]
        scale: Option<GradeScale>,
    },

    /// Print each student's average and standing
    Report {
        #[arg(long)]
        scale: Option<GradeScale>,
    },

    /// Parse raw score entries and show which ones are corrupt
    Clean {
        #[arg(required = true, allow_hyphen_values = true)]
        entries: Vec<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and their sources
    Show,

    /// Print the settings file path
    Path,

    /// Save the default data directory
    SetDataDir {
        /// Directory to use
        #[arg(required_unless_present = "clear")]
        path: Option<PathBuf>,
        /// Remove the saved data directory instead
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },
}
