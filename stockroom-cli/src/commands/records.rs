//! Subcommands shared by books and items.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use stockroom_catalog::{CatalogError, CatalogStore, Record, RecordId};

use crate::CliError;
use crate::cli_types::{SearchArgs, StockChange};
use crate::display::{TableRow, render_table};
use crate::storage::{Persisted, Storage};

/// A stock change, already reduced to one of its two forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StockUpdate {
    Add(i64),
    Set(i64),
}

impl From<&StockChange> for StockUpdate {
    fn from(change: &StockChange) -> Self {
        match change.set {
            Some(n) => Self::Set(n),
            None => Self::Add(change.add.unwrap_or(0)),
        }
    }
}

impl StockUpdate {
    pub(crate) fn apply<R: Record>(
        self,
        store: &mut CatalogStore<R>,
        id: RecordId,
    ) -> Result<u64, CatalogError> {
        match self {
            Self::Add(delta) => store.adjust_quantity(id, delta),
            Self::Set(n) => store.set_quantity(id, n),
        }
    }
}

/// Human-readable identity used in messages: `'Dune' (Ace)` or `'Widget'`.
pub(crate) fn describe(name: &str, publisher: Option<&str>) -> String {
    match publisher {
        Some(p) => format!("'{}' ({})", name.trim(), p.trim()),
        None => format!("'{}'", name.trim()),
    }
}

/// Exact lookup that turns a miss into [`CatalogError::NotFound`].
pub(crate) fn locate<R: Record>(
    store: &CatalogStore<R>,
    name: &str,
    publisher: Option<&str>,
) -> Result<RecordId, CatalogError> {
    store.find_exact(name, publisher).ok_or_else(|| {
        CatalogError::not_found(format!("no {} named {}", R::KIND.noun, describe(name, publisher)))
    })
}

/// Register a record, or restock the existing one.
pub(crate) fn run_add<R: Persisted>(storage: &Storage, draft: R) -> Result<(), CliError> {
    let mut store = storage.open::<R>()?;
    let name = draft.name().to_string();
    let added = draft.quantity();
    let outcome = store.upsert(draft)?;
    storage.save(&store)?;

    if outcome.created {
        log::info!(
            "{} {} '{}' with {} units",
            "Registered".if_supports_color(Stdout, |t| t.green()),
            R::KIND.noun,
            name,
            outcome.quantity,
        );
    } else {
        log::info!(
            "{} '{}' already exists; restocked by {} to {} units",
            "Restocked".if_supports_color(Stdout, |t| t.green()),
            name,
            added,
            outcome.quantity,
        );
    }
    Ok(())
}

pub(crate) fn run_list<R: Persisted + TableRow>(storage: &Storage) -> Result<(), CliError> {
    let store = storage.open::<R>()?;
    if store.is_empty() {
        log::info!("No {} yet.", R::KIND.plural);
        return Ok(());
    }
    for line in render_table(store.records()) {
        log::info!("{line}");
    }
    crate::log_blank();
    log::info!(
        "{} {}, {} units in stock",
        store.len(),
        R::KIND.plural,
        store.total_quantity(),
    );
    Ok(())
}

pub(crate) fn run_search<R: Persisted + TableRow>(
    storage: &Storage,
    args: &SearchArgs,
) -> Result<(), CliError> {
    let store = storage.open::<R>()?;
    let hits: Vec<&R> = store.filter(args.by, &args.term).map(|(_, r)| r).collect();
    if hits.is_empty() {
        log::info!(
            "No {} with {} containing '{}'.",
            R::KIND.plural,
            args.by,
            args.term.trim(),
        );
        return Ok(());
    }
    for line in render_table(hits.iter().copied()) {
        log::info!("{line}");
    }
    crate::log_blank();
    log::info!("{} match(es)", hits.len());
    Ok(())
}

pub(crate) fn run_stock<R: Persisted>(
    storage: &Storage,
    name: &str,
    publisher: Option<&str>,
    change: &StockChange,
) -> Result<(), CliError> {
    let mut store = storage.open::<R>()?;
    let id = locate(&store, name, publisher)?;
    let update = StockUpdate::from(change);
    let before = store.get(id).map_or(0, |r| r.quantity());
    let after = update.apply(&mut store, id)?;
    storage.save(&store)?;

    log::info!(
        "Stock of {}: {} -> {}",
        describe(name, publisher),
        before,
        after.if_supports_color(Stdout, |t| t.bold()),
    );
    if after == 0 {
        log::warn!("{} is now out of stock", describe(name, publisher));
    }
    Ok(())
}

pub(crate) fn run_remove<R: Persisted + TableRow>(
    storage: &Storage,
    name: &str,
    publisher: Option<&str>,
    confirm: bool,
) -> Result<(), CliError> {
    let mut store = storage.open::<R>()?;
    let id = locate(&store, name, publisher)?;

    if !confirm {
        log::warn!("This will permanently remove:");
        for line in render_table(store.get(id)) {
            log::warn!("  {line}");
        }
        log::info!("Re-run with --confirm to proceed.");
        return Ok(());
    }

    let removed = store.remove(id)?;
    storage.save(&store)?;
    log::info!(
        "{} {} '{}' ({} units)",
        "Removed".if_supports_color(Stdout, |t| t.bold()),
        R::KIND.noun,
        removed.name(),
        removed.quantity(),
    );
    Ok(())
}

/// Run the dedup pass explicitly and report how many records were folded.
pub(crate) fn run_dedup<R: Persisted>(storage: &Storage) -> Result<(), CliError> {
    let mut store = storage.load::<R>()?;
    let before = store.len();
    let merged = store.deduplicate_and_merge();

    if merged == 0 {
        log::info!("No duplicate {} found ({} checked).", R::KIND.plural, before);
        return Ok(());
    }

    storage.save(&store)?;
    log::info!(
        "{} {} duplicate {}: {} -> {} records",
        "Merged".if_supports_color(Stdout, |t| t.green()),
        merged,
        R::KIND.plural,
        before,
        store.len(),
    );
    Ok(())
}
