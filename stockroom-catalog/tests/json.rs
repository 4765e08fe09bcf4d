use std::fs;

use stockroom_catalog::json::{backup_unreadable, quarantine_path};
use stockroom_catalog::*;
use tempfile::TempDir;

#[test]
fn missing_file_is_empty_collection() {
    let tmp = TempDir::new().unwrap();
    let snapshot: Snapshot<Book> = load_snapshot(&tmp.path().join("biblioteca.json")).unwrap();
    assert_eq!(snapshot.status, LoadStatus::Missing);
    assert!(snapshot.records.is_empty());
    assert!(snapshot.quarantined.is_empty());
}

#[test]
fn unparsable_file_is_empty_collection() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("biblioteca.json");
    fs::write(&path, "{ not json").unwrap();

    let snapshot: Snapshot<Book> = load_snapshot(&path).unwrap();
    assert!(matches!(snapshot.status, LoadStatus::Unreadable(_)));
    assert!(snapshot.records.is_empty());
}

#[test]
fn non_array_file_is_unreadable() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");
    fs::write(&path, r#"{"nombre": "Widget"}"#).unwrap();

    let snapshot: Snapshot<Item> = load_snapshot(&path).unwrap();
    assert!(matches!(snapshot.status, LoadStatus::Unreadable(_)));
}

#[test]
fn loads_snapshot_written_without_ids() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("biblioteca.json");
    fs::write(
        &path,
        r#"[
    {
        "nombre": "Cien Años de Soledad",
        "categoria": "Novela",
        "autor": "Gabo",
        "editorial": "Sudamericana",
        "paginas": 400,
        "cantidad": 10
    }
]"#,
    )
    .unwrap();

    let snapshot: Snapshot<Book> = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.status, LoadStatus::Loaded);
    assert_eq!(snapshot.records.len(), 1);
    let book = &snapshot.records[0];
    assert_eq!(book.name, "Cien Años de Soledad");
    assert_eq!(book.publisher, "Sudamericana");
    assert_eq!(book.pages, 400);
    assert_eq!(book.quantity, 10);
}

#[test]
fn malformed_entries_are_quarantined() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");
    fs::write(
        &path,
        r#"[
    {"nombre": "Widget", "precio": 2.5, "cantidad": 3},
    {"nombre": "Broken", "precio": 1.0, "cantidad": -4},
    {"precio": 1.0, "cantidad": 1},
    {"nombre": "  ", "precio": 1.0, "cantidad": 1},
    "garbage",
    {"nombre": "Gadget", "precio": 0, "cantidad": 0}
]"#,
    )
    .unwrap();

    let snapshot: Snapshot<Item> = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.status, LoadStatus::Loaded);
    let names: Vec<&str> = snapshot.records.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Widget", "Gadget"]);
    let indices: Vec<usize> = snapshot.quarantined.iter().map(|q| q.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);

    let written = save_quarantine(&path, &snapshot.quarantined).unwrap().unwrap();
    assert_eq!(written, quarantine_path(&path));
    let rejected: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(rejected.as_array().unwrap().len(), 4);
    assert_eq!(rejected[0]["entry"]["nombre"], "Broken");
}

#[test]
fn empty_quarantine_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");
    assert!(save_quarantine(&path, &[]).unwrap().is_none());
    assert!(!quarantine_path(&path).exists());
}

#[test]
fn save_then_load_keeps_ids_and_field_names() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("biblioteca.json");

    let mut store = CatalogStore::new();
    let id = store
        .upsert(Book::new("Dune", "SciFi", "Herbert", "Ace", 412, 5))
        .unwrap()
        .id;
    save_snapshot(&path, store.records()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"editorial\": \"Ace\""));
    assert!(text.contains("    {"), "snapshot is indented by four spaces");

    let snapshot: Snapshot<Book> = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.records[0].id, id);
}

#[test]
fn backup_moves_unreadable_file_aside() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("biblioteca.json");
    fs::write(&path, "[oops").unwrap();

    let backup = backup_unreadable(&path).unwrap();
    assert!(!path.exists());
    assert_eq!(fs::read_to_string(backup).unwrap(), "[oops");
}

#[test]
fn non_utf8_file_is_unreadable() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");
    fs::write(&path, b"[{\"nombre\": \"Ca\xF1a\", \"precio\": 1.0, \"cantidad\": 50}]").unwrap();

    let snapshot: Snapshot<Item> = load_snapshot(&path).unwrap();
    assert!(matches!(snapshot.status, LoadStatus::Unreadable(_)));
}

#[test]
fn recover_moves_unreadable_file_aside() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");
    let original = b"[{\"nombre\": \"Ca\xF1a\", \"precio\": 1.0, \"cantidad\": 50}]";
    fs::write(&path, original).unwrap();

    let snapshot: Snapshot<Item> = recover_snapshot(&path).unwrap();
    assert!(matches!(snapshot.status, LoadStatus::Unreadable(_)));
    assert!(snapshot.records.is_empty());
    assert!(!path.exists());
    assert_eq!(fs::read(tmp.path().join("inventario.corrupt")).unwrap(), original);
}

#[test]
fn recover_leaves_missing_file_alone() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");

    let snapshot: Snapshot<Item> = recover_snapshot(&path).unwrap();
    assert_eq!(snapshot.status, LoadStatus::Missing);
    assert!(!tmp.path().join("inventario.corrupt").exists());
    assert!(!quarantine_path(&path).exists());
}

#[test]
fn book_without_publisher_loads() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("biblioteca.json");
    fs::write(
        &path,
        r#"[
    {"nombre": "Dune", "editorial": "", "paginas": 412, "cantidad": 2},
    {"nombre": "Emma", "paginas": 300, "cantidad": 1}
]"#,
    )
    .unwrap();

    let snapshot: Snapshot<Book> = load_snapshot(&path).unwrap();
    assert!(snapshot.quarantined.is_empty());
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.records[0].publisher, "");
}

#[test]
fn quarantine_accumulates_across_loads() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("inventario.json");

    fs::write(&path, r#"[{"nombre": "First", "cantidad": -1}]"#).unwrap();
    let first: Snapshot<Item> = recover_snapshot(&path).unwrap();
    assert_eq!(first.quarantined.len(), 1);

    fs::write(
        &path,
        r#"[{"nombre": "Second", "cantidad": -2}, {"nombre": "First", "cantidad": -1}]"#,
    )
    .unwrap();
    let second: Snapshot<Item> = recover_snapshot(&path).unwrap();
    assert_eq!(second.quarantined.len(), 2);

    let rejected: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(quarantine_path(&path)).unwrap()).unwrap();
    let names: Vec<&str> = rejected
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["entry"]["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[test]
fn second_backup_keeps_the_first() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("biblioteca.json");
    fs::write(&path, "[oops").unwrap();
    backup_unreadable(&path).unwrap();
    fs::write(&path, "[again").unwrap();

    let second = backup_unreadable(&path).unwrap();
    assert_eq!(second, tmp.path().join("biblioteca.1.corrupt"));
    assert_eq!(fs::read_to_string(tmp.path().join("biblioteca.corrupt")).unwrap(), "[oops");
    assert_eq!(fs::read_to_string(second).unwrap(), "[again");
}
