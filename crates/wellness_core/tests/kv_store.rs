use serde_json::json;
use wellness_core::db::{open_db, open_db_in_memory};
use wellness_core::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError};

#[test]
fn sqlite_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");

    let mut store = SqliteKvStore::new(open_db(&path).unwrap());
    store.save("prefs", &json!({"theme": "calm"})).unwrap();
    store.save("prefs", &json!({"theme": "bright"})).unwrap();
    drop(store);

    let store = SqliteKvStore::new(open_db(&path).unwrap());
    assert_eq!(store.load("prefs"), Some(json!({"theme": "bright"})));
    assert_eq!(store.load("missing"), None);
}

#[test]
fn sqlite_quota_counts_other_keys_and_keeps_old_value() {
    // "a" + "[1,2,3]" = 8 bytes, "b" + "1" = 2 bytes.
    let mut store = SqliteKvStore::with_capacity(open_db_in_memory().unwrap(), 10);
    store.save("a", &json!([1, 2, 3])).unwrap();
    store.save("b", &json!(1)).unwrap();

    let err = store.save("b", &json!(12)).unwrap_err();
    match err {
        StoreError::QuotaExceeded {
            key,
            required_bytes,
            capacity_bytes,
        } => {
            assert_eq!(key, "b");
            assert_eq!(required_bytes, 11);
            assert_eq!(capacity_bytes, 10);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.load("b"), Some(json!(1)));

    // Replacing a key does not count its previous value.
    store.save("a", &json!([9, 9, 9])).unwrap();
}

#[test]
fn sqlite_corrupt_payload_reads_as_absent() {
    let store = SqliteKvStore::new(open_db_in_memory().unwrap());
    store
        .connection()
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES ('broken', '{\"moods\": [');",
            [],
        )
        .unwrap();

    assert_eq!(store.load("broken"), None);
}

#[test]
fn remove_is_idempotent_on_both_stores() {
    let mut sqlite = SqliteKvStore::new(open_db_in_memory().unwrap());
    let mut memory = MemoryKvStore::new();
    let stores: [&mut dyn KeyValueStore; 2] = [&mut sqlite, &mut memory];

    for store in stores {
        store.save("k", &json!("v")).unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.load("k"), None);
    }
}
