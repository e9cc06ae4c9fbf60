use quote_common::config::QUOTES_KEY;
use quote_common::quote::default_quotes;
use quote_common::storage::{FileStorage, KeyValueStore};
use quote_common::{CategoryFilter, Quote, QuoteStore};
use std::fs;
use std::sync::Arc;

#[test]
fn quotes_survive_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
        let mut store = QuoteStore::load(storage).unwrap();
        store.add("Hello", "Wisdom").unwrap();
        store
            .select_filter(&CategoryFilter::Category("Wisdom".to_string()))
            .unwrap();
    }

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let store = QuoteStore::load(storage).unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.quotes().last(), Some(&Quote::new("Hello", "Wisdom")));
    assert_eq!(
        store.selected_filter(),
        CategoryFilter::Category("Wisdom".to_string())
    );
}

#[test]
fn truncated_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("quotes.json"), "[{\"text\": \"half").unwrap();

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let store = QuoteStore::load(storage.clone()).unwrap();
    assert_eq!(store.quotes(), default_quotes().as_slice());

    let raw = storage.get(QUOTES_KEY).unwrap().unwrap();
    let persisted: Vec<Quote> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, default_quotes());
}

#[test]
fn empty_array_on_disk_is_reseeded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("quotes.json"), "[]").unwrap();

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let store = QuoteStore::load(storage).unwrap();
    assert_eq!(store.len(), 3);
}

#[test]
fn exported_file_imports_back() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::open(dir.path().join("data")).unwrap());
    let mut store = QuoteStore::load(storage).unwrap();

    let export_path = dir.path().join("quotes.json");
    fs::write(&export_path, store.export_json().unwrap()).unwrap();

    let content = fs::read_to_string(&export_path).unwrap();
    assert_eq!(store.import_json(&content).unwrap(), 3);
    assert_eq!(store.len(), 6);
}
