use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use stockroom_catalog::{Item, checked_quantity, read_legacy_inventory};

use crate::CliError;
use crate::cli_types::ItemAction;
use crate::storage::Storage;

use super::records;

pub(crate) fn run_items(storage: &Storage, action: ItemAction) -> Result<(), CliError> {
    match action {
        ItemAction::Add {
            name,
            category,
            price,
            quantity,
        } => {
            let quantity = checked_quantity(quantity)?;
            records::run_add(storage, Item::new(name, category, price, quantity))
        }
        ItemAction::List => records::run_list::<Item>(storage),
        ItemAction::Search(args) => records::run_search::<Item>(storage, &args),
        ItemAction::Stock { name, change } => {
            records::run_stock::<Item>(storage, &name, None, &change)
        }
        ItemAction::Remove { name, confirm } => {
            records::run_remove::<Item>(storage, &name, None, confirm)
        }
        ItemAction::Dedup => records::run_dedup::<Item>(storage),
        ItemAction::ImportLegacy { file } => run_import_legacy(storage, &file),
    }
}

/// Upsert every usable line of a legacy inventory file into the inventory.
fn run_import_legacy(storage: &Storage, file: &Path) -> Result<(), CliError> {
    let import = read_legacy_inventory(file)?;
    if import.items.is_empty() {
        log::warn!("No usable lines in {}", file.display());
        if import.skipped > 0 {
            log::warn!("{} line(s) skipped", import.skipped);
        }
        return Ok(());
    }

    let mut store = storage.open::<Item>()?;
    let mut created = 0;
    let mut restocked = 0;
    for item in import.items {
        let name = item.name.clone();
        match store.upsert(item) {
            Ok(outcome) if outcome.created => created += 1,
            Ok(_) => restocked += 1,
            Err(e) => log::warn!("Skipping '{name}': {e}"),
        }
    }
    storage.save(&store)?;

    log::info!(
        "{} {}",
        "Imported".if_supports_color(Stdout, |t| t.green()),
        file.display(),
    );
    log::info!("  New items:  {created:>6}");
    log::info!("  Restocked:  {restocked:>6}");
    if import.skipped > 0 {
        log::info!(
            "  Skipped:    {:>6}",
            import.skipped.if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    Ok(())
}
