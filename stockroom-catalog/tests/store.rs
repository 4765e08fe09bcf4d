use stockroom_catalog::*;

fn dune(publisher: &str, quantity: u64) -> Book {
    Book::new("Dune", "SciFi", "Frank Herbert", publisher, 412, quantity)
}

fn widget(quantity: u64) -> Item {
    Item::new("Widget", "tools", 2.5, quantity)
}

#[test]
fn upsert_same_name_restocks() {
    let mut store = CatalogStore::new();
    let first = store.upsert(widget(5)).unwrap();
    let second = store.upsert(Item::new("  WIDGET ", "other", 9.0, 3)).unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.id, second.id);
    assert_eq!(store.len(), 1);

    let item = store.get(first.id).unwrap();
    assert_eq!(item.quantity, 8);
    // Descriptive fields come from the first call only.
    assert_eq!(item.category, "tools");
    assert_eq!(item.unit_price, 2.5);
}

#[test]
fn upsert_sums_every_call() {
    let mut store = CatalogStore::new();
    let quantities = [4, 0, 11, 2, 7];
    for q in quantities {
        store.upsert(dune("Ace", q)).unwrap();
    }
    assert_eq!(store.len(), 1);
    assert_eq!(store.total_quantity(), quantities.iter().sum::<u64>());
}

#[test]
fn upsert_books_with_different_publishers_are_distinct() {
    let mut store = CatalogStore::new();
    store.upsert(dune("Ace", 1)).unwrap();
    store.upsert(dune("Chilton", 1)).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn upsert_rejects_invalid_drafts() {
    let mut store: CatalogStore<Item> = CatalogStore::new();
    assert!(matches!(
        store.upsert(Item::new("   ", "", 1.0, 1)),
        Err(CatalogError::Validation(_))
    ));
    assert!(matches!(
        store.upsert(Item::new("Widget", "", -0.5, 1)),
        Err(CatalogError::Validation(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn adjust_quantity_rejects_negative_result() {
    let mut store = CatalogStore::new();
    let id = store.upsert(widget(4)).unwrap().id;

    let err = store.adjust_quantity(id, -10).unwrap_err();
    match err {
        CatalogError::InsufficientStock {
            name,
            available,
            change,
        } => {
            assert_eq!(name, "Widget");
            assert_eq!(available, 4);
            assert_eq!(change, -10);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.get(id).unwrap().quantity, 4);
}

#[test]
fn adjust_quantity_applies_in_place() {
    let mut store = CatalogStore::new();
    let id = store.upsert(widget(4)).unwrap().id;
    assert_eq!(store.adjust_quantity(id, 6).unwrap(), 10);
    assert_eq!(store.adjust_quantity(id, -10).unwrap(), 0);
    assert_eq!(store.get(id).unwrap().quantity, 0);
}

#[test]
fn quantity_never_goes_negative_across_a_sequence() {
    let mut store = CatalogStore::new();
    let id = store.upsert(widget(3)).unwrap().id;
    let mut expected: i64 = 3;
    for delta in [-1, -5, 4, -6, -2, 10, -11, 0, -1] {
        match store.adjust_quantity(id, delta) {
            Ok(q) => {
                expected += delta;
                assert_eq!(q as i64, expected);
            }
            Err(CatalogError::InsufficientStock { .. }) => {
                assert!(expected + delta < 0);
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
        assert_eq!(store.get(id).unwrap().quantity as i64, expected);
    }
}

#[test]
fn set_quantity_absolute() {
    let mut store = CatalogStore::new();
    let id = store.upsert(widget(3)).unwrap().id;
    assert_eq!(store.set_quantity(id, 42).unwrap(), 42);
    assert!(matches!(
        store.set_quantity(id, -1),
        Err(CatalogError::InsufficientStock { .. })
    ));
    assert_eq!(store.get(id).unwrap().quantity, 42);
}

#[test]
fn remove_twice_reports_not_found() {
    let mut store = CatalogStore::new();
    let id = store.upsert(widget(1)).unwrap().id;
    let other = store.upsert(Item::new("Gadget", "", 1.0, 2)).unwrap().id;

    let removed = store.remove(id).unwrap();
    assert_eq!(removed.name, "Widget");
    assert!(matches!(store.remove(id), Err(CatalogError::NotFound(_))));
    assert!(matches!(
        store.adjust_quantity(id, 1),
        Err(CatalogError::NotFound(_))
    ));
    assert_eq!(store.get(other).unwrap().quantity, 2);
    assert_eq!(store.len(), 1);
}

#[test]
fn find_exact_matches_normalized_name() {
    let mut store = CatalogStore::new();
    let id = store.upsert(widget(1)).unwrap().id;
    assert_eq!(store.find_exact(" widget ", None), Some(id));
    assert_eq!(store.find_exact("widg", None), None);
    assert_eq!(store.find_exact("gizmo", None), None);
}

#[test]
fn find_exact_with_publisher() {
    let mut store = CatalogStore::new();
    let ace = store.upsert(dune("Ace", 1)).unwrap().id;
    let chilton = store.upsert(dune("Chilton", 1)).unwrap().id;

    assert_eq!(store.find_exact("dune", Some("CHILTON")), Some(chilton));
    assert_eq!(store.find_exact("dune", Some("ace")), Some(ace));
    assert_eq!(store.find_exact("dune", Some("Tor")), None);
    // Name alone returns the first in collection order.
    assert_eq!(store.find_exact("dune", None), Some(ace));
}

#[test]
fn find_exact_publisher_never_matches_items() {
    let mut store = CatalogStore::new();
    store.upsert(widget(1)).unwrap();
    assert_eq!(store.find_exact("widget", Some("")), None);
}

#[test]
fn find_exact_returns_first_of_unmerged_duplicates() {
    let first = dune("Ace", 3);
    let second = dune("ace ", 7);
    let first_id = first.id;
    let store = CatalogStore::from_records(vec![first, second]);
    assert_eq!(store.find_exact("Dune", Some("Ace")), Some(first_id));
}

#[test]
fn filter_is_substring_and_case_insensitive() {
    let mut store = CatalogStore::new();
    store.upsert(dune("Ace", 1)).unwrap();
    store
        .upsert(Book::new("Emma", "Romance", "Jane Austen", "Penguin", 474, 2))
        .unwrap();
    store
        .upsert(Book::new("Neuromancer", "SciFi", "William Gibson", "Ace", 271, 1))
        .unwrap();

    let names = |field: Field, term: &str| -> Vec<String> {
        store
            .filter(field, term)
            .map(|(_, b)| b.name.clone())
            .collect()
    };

    assert_eq!(names(Field::Category, "scif"), vec!["Dune", "Neuromancer"]);
    assert_eq!(names(Field::Publisher, " ACE"), vec!["Dune", "Neuromancer"]);
    assert_eq!(names(Field::Name, "EMM"), vec!["Emma"]);
    assert_eq!(names(Field::Author, "austen"), vec!["Emma"]);
    assert!(names(Field::Name, "zzz").is_empty());
}

#[test]
fn filter_on_missing_field_matches_nothing() {
    let mut store = CatalogStore::new();
    store.upsert(widget(1)).unwrap();
    assert_eq!(store.filter(Field::Publisher, "").count(), 0);
    assert_eq!(store.filter(Field::Category, "").count(), 1);
}

#[test]
fn dedup_merges_into_first_seen() {
    let first = Book::new("Dune", "SciFi", "Frank Herbert", "Ace", 412, 3);
    let second = Book::new(" dune", "Classics", "F. Herbert", "ACE", 500, 7);
    let first_id = first.id;
    let mut store = CatalogStore::from_records(vec![first, second]);

    assert_eq!(store.deduplicate_and_merge(), 1);
    assert_eq!(store.len(), 1);
    let book = store.get(first_id).unwrap();
    assert_eq!(book.quantity, 10);
    assert_eq!(book.category, "SciFi");
    assert_eq!(book.author, "Frank Herbert");
    assert_eq!(book.pages, 412);
}

#[test]
fn dedup_preserves_total_and_order() {
    let records = vec![
        Item::new("Widget", "", 1.0, 2),
        Item::new("Gadget", "", 1.0, 5),
        Item::new("widget", "", 1.0, 9),
        Item::new("Sprocket", "", 1.0, 0),
        Item::new("GADGET ", "", 1.0, 1),
        Item::new("Widget", "", 1.0, 4),
    ];
    let mut store = CatalogStore::from_records(records);
    let before = store.total_quantity();

    assert_eq!(store.deduplicate_and_merge(), 3);
    assert_eq!(store.total_quantity(), before);

    let summary: Vec<(String, u64)> = store
        .records()
        .map(|i| (i.name.clone(), i.quantity))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Widget".to_string(), 15),
            ("Gadget".to_string(), 6),
            ("Sprocket".to_string(), 0),
        ]
    );
}

#[test]
fn dedup_is_idempotent() {
    let mut store = CatalogStore::from_records(vec![
        dune("Ace", 1),
        dune("Ace", 2),
        dune("Chilton", 3),
    ]);
    assert_eq!(store.deduplicate_and_merge(), 1);
    let after_first: Vec<Book> = store.records().cloned().collect();

    assert_eq!(store.deduplicate_and_merge(), 0);
    let after_second: Vec<Book> = store.records().cloned().collect();
    assert_eq!(after_first, after_second);
}

#[test]
fn dedup_keeps_ids_usable() {
    let mut store = CatalogStore::from_records(vec![widget(1), widget(2)]);
    store.deduplicate_and_merge();
    let id = store.find_exact("widget", None).unwrap();
    assert_eq!(store.adjust_quantity(id, -3).unwrap(), 0);
}
