use stockroom_catalog::{Book, CatalogError, checked_quantity};

use crate::CliError;
use crate::cli_types::BookAction;
use crate::storage::Storage;

use super::records;

pub(crate) fn run_books(storage: &Storage, action: BookAction) -> Result<(), CliError> {
    match action {
        BookAction::Add {
            name,
            category,
            author,
            publisher,
            pages,
            quantity,
        } => {
            let quantity = checked_quantity(quantity)?;
            // Stored books may lack one, but new ones need it for lookups.
            if publisher.trim().is_empty() {
                return Err(CatalogError::validation("publisher must not be empty").into());
            }
            let draft = Book::new(name, category, author, publisher, pages, quantity);
            records::run_add(storage, draft)
        }
        BookAction::List => records::run_list::<Book>(storage),
        BookAction::Search(args) => records::run_search::<Book>(storage, &args),
        BookAction::Stock {
            name,
            publisher,
            change,
        } => records::run_stock::<Book>(storage, &name, Some(&publisher), &change),
        BookAction::Remove {
            name,
            publisher,
            confirm,
        } => records::run_remove::<Book>(storage, &name, Some(&publisher), confirm),
        BookAction::Dedup => records::run_dedup::<Book>(storage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli_types::Backend;
    use tempfile::TempDir;

    fn add(publisher: &str) -> BookAction {
        BookAction::Add {
            name: "Dune".to_string(),
            category: String::new(),
            author: "Herbert".to_string(),
            publisher: publisher.to_string(),
            pages: 412,
            quantity: 2,
        }
    }

    #[test]
    fn add_requires_publisher() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf(), Backend::Json);

        let err = run_books(&storage, add("  ")).unwrap_err();
        assert!(matches!(err, CliError::Catalog(_)));
        assert!(!storage.location::<Book>().exists());

        run_books(&storage, add("Ace")).unwrap();
        assert_eq!(storage.open::<Book>().unwrap().total_quantity(), 2);
    }
}
