use bookshelf::{BookStore, Error};
use serde_json::json;
use tempfile::TempDir;

fn open(dir: &TempDir) -> BookStore {
    BookStore::open(dir.path().join("books.json")).unwrap()
}

// ---- add --------------------------------------------------------------------

#[test]
fn add_assigns_increasing_unique_ids() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let a = store.add(json!({"title": "Dune", "author": "Herbert"})).unwrap();
    let b = store.add(json!({"title": "Hyperion", "author": "Simmons"})).unwrap();
    let c = store.add(json!({"title": "Foundation", "author": "Asimov"})).unwrap();
    assert_eq!((a.id, b.id, c.id), (1, 2, 3));

    assert_eq!(store.find(2).unwrap().title, "Hyperion");
    assert_eq!(store.find(3).unwrap().author, "Asimov");
}

#[test]
fn add_missing_title_or_author_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let no_author = store.add(json!({"title": "Dune"}));
    assert!(matches!(no_author, Err(Error::InvalidBook(_))));

    let no_title = store.add(json!({"author": "Herbert"}));
    assert!(matches!(no_title, Err(Error::InvalidBook(_))));

    let not_an_object = store.add(json!(["Dune", "Herbert"]));
    assert!(matches!(not_an_object, Err(Error::InvalidBook(_))));

    assert!(store.is_empty());
    // No mutation, no persist.
    assert!(!store.path().exists());
}

#[test]
fn add_rejects_non_string_title() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let err = store.add(json!({"title": 42, "author": "Herbert"}));
    assert!(matches!(err, Err(Error::InvalidBook(_))));
    assert!(store.is_empty());
}

#[test]
fn add_discards_client_supplied_id() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let book = store
        .add(json!({"id": 99, "title": "Dune", "author": "Herbert"}))
        .unwrap();
    assert_eq!(book.id, 1);
    assert!(!book.extra.contains_key("id"));
    assert!(store.find(99).is_none());
}

#[test]
fn add_preserves_extra_fields_verbatim() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let book = store
        .add(json!({
            "title": "Dune",
            "author": "Herbert",
            "year": 1965,
            "tags": ["sf", "classic"]
        }))
        .unwrap();
    assert_eq!(book.extra["year"], json!(1965));
    assert_eq!(book.extra["tags"], json!(["sf", "classic"]));

    let found = store.find(1).unwrap();
    assert_eq!(found, book);
}

#[test]
fn next_id_is_max_plus_one_after_deleting_highest() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add(json!({"title": "a", "author": "x"})).unwrap();
    store.add(json!({"title": "b", "author": "x"})).unwrap();
    store.remove(2).unwrap();

    let c = store.add(json!({"title": "c", "author": "x"})).unwrap();
    assert_eq!(c.id, 2);
}

// ---- update -----------------------------------------------------------------

#[test]
fn update_merges_patch_and_preserves_other_fields() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store
        .add(json!({"title": "Dune", "author": "Herbert", "year": 1965}))
        .unwrap();

    let updated = store.update(1, json!({"author": "F. Herbert"})).unwrap();
    assert_eq!(updated.author, "F. Herbert");
    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.extra["year"], json!(1965));
    assert_eq!(store.find(1).unwrap(), updated);
}

#[test]
fn update_adds_new_fields() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add(json!({"title": "Dune", "author": "Herbert"})).unwrap();

    let updated = store.update(1, json!({"rating": 5})).unwrap();
    assert_eq!(updated.extra["rating"], json!(5));
}

#[test]
fn update_ignores_id_in_patch() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add(json!({"title": "Dune", "author": "Herbert"})).unwrap();

    let updated = store.update(1, json!({"id": 42, "author": "F. Herbert"})).unwrap();
    assert_eq!(updated.id, 1);
    assert!(store.find(42).is_none());
}

#[test]
fn update_missing_id_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let err = store.update(7, json!({"author": "nobody"})).unwrap_err();
    assert_eq!(err, Error::NotFound(7));
}

#[test]
fn update_rejecting_bad_patch_leaves_record_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add(json!({"title": "Dune", "author": "Herbert"})).unwrap();

    let err = store.update(1, json!({"title": 42}));
    assert!(matches!(err, Err(Error::InvalidBook(_))));
    assert_eq!(store.find(1).unwrap().title, "Dune");
}

// ---- remove -----------------------------------------------------------------

#[test]
fn remove_then_find_is_none() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add(json!({"title": "Dune", "author": "Herbert"})).unwrap();

    let removed = store.remove(1).unwrap();
    assert_eq!(removed.title, "Dune");
    assert!(store.find(1).is_none());
    assert!(store.is_empty());
}

#[test]
fn remove_missing_id_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    assert_eq!(store.remove(3).unwrap_err(), Error::NotFound(3));
}

// ---- queries ----------------------------------------------------------------

#[test]
fn by_author_matches_exactly_and_case_sensitively() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add(json!({"title": "Dune", "author": "Herbert"})).unwrap();
    store.add(json!({"title": "Dune Messiah", "author": "Herbert"})).unwrap();
    store.add(json!({"title": "Hyperion", "author": "Simmons"})).unwrap();

    let hits = store.by_author("Herbert");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|b| b.author == "Herbert"));

    assert!(store.by_author("herbert").is_empty());
    assert!(store.by_author("F. Herbert").is_empty());
}

#[test]
fn list_keeps_insertion_order() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    for title in ["c", "a", "b"] {
        store.add(json!({"title": title, "author": "x"})).unwrap();
    }
    let titles: Vec<String> = store.list().into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["c", "a", "b"]);
}
