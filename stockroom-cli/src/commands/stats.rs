use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use stockroom_catalog::roster::ROSTER_FILE;
use stockroom_catalog::{Book, Item, Student, load_snapshot};

use crate::CliError;
use crate::display::capitalize;
use crate::storage::{Persisted, Storage};

pub(crate) fn run_stats(storage: &Storage) -> Result<(), CliError> {
    log::info!(
        "{}",
        "Stockroom Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  Data: {} ({})",
        storage.data_dir.display(),
        storage.backend.as_str(),
    );
    crate::log_blank();

    collection_line::<Book>(storage)?;
    collection_line::<Item>(storage)?;

    let students = load_snapshot::<Student>(&storage.data_dir.join(ROSTER_FILE))?
        .records
        .len();
    log::info!("  Students:  {students:>8}");
    Ok(())
}

fn collection_line<R: Persisted>(storage: &Storage) -> Result<(), CliError> {
    let store = storage.open::<R>()?;
    let label = format!("{}:", capitalize(R::KIND.plural));
    log::info!(
        "  {label:<10} {:>8} records, {:>8} units",
        store.len(),
        store.total_quantity(),
    );
    let empty = store.records().filter(|r| r.quantity() == 0).count();
    if empty > 0 {
        log::info!(
            "  {:<10} {}",
            "",
            format!("{empty} out of stock").if_supports_color(Stdout, |t| t.red()),
        );
    }
    Ok(())
}
