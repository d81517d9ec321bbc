//! In-memory key-value store.
//!
//! Holds encoded JSON text rather than `Value` so capacity accounting and
//! corrupt-payload handling behave exactly like the SQLite store.

use super::{
    check_capacity, decode_payload, encode_payload, entry_footprint, KeyValueStore, StoreResult,
    DEFAULT_CAPACITY_BYTES,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Process-local store; contents are lost when dropped.
#[derive(Debug, Clone)]
pub struct MemoryKvStore {
    entries: BTreeMap<String, String>,
    capacity_bytes: u64,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_BYTES)
    }

    pub fn with_capacity(capacity_bytes: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity_bytes,
        }
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    /// Current footprint of all stored keys and values.
    pub fn used_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|(key, raw)| entry_footprint(key, raw))
            .sum()
    }

    /// Returns the encoded payload stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores `raw` verbatim, bypassing encoding and capacity checks.
    ///
    /// Used to seed payloads written by older or foreign clients.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(key.into(), raw.into());
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn save(&mut self, key: &str, value: &Value) -> StoreResult<()> {
        let raw = encode_payload(value)?;
        let other_bytes: u64 = self
            .entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, payload)| entry_footprint(existing, payload))
            .sum();
        check_capacity(key, other_bytes, &raw, self.capacity_bytes)?;

        self.entries.insert(key.to_string(), raw);
        Ok(())
    }

    fn load(&self, key: &str) -> Option<Value> {
        let raw = self.entries.get(key)?;
        decode_payload(key, raw)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::store::KeyValueStore;
    use serde_json::json;

    #[test]
    fn save_then_load_returns_value() {
        let mut store = MemoryKvStore::new();
        store.save("k", &json!({"moods": []})).unwrap();

        assert_eq!(store.load("k"), Some(json!({"moods": []})));
        assert_eq!(store.load("missing"), None);
    }

    #[test]
    fn replacing_a_key_does_not_double_count_its_footprint() {
        // "k" + "[1,2]" = 6 bytes.
        let mut store = MemoryKvStore::with_capacity(6);
        store.save("k", &json!([1, 2])).unwrap();
        store.save("k", &json!([3, 4])).unwrap();
        assert_eq!(store.used_bytes(), 6);

        let err = store.save("k", &json!([1, 2, 3])).unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(store.raw("k"), Some("[3,4]"));
    }

    #[test]
    fn corrupt_payload_reads_as_absent() {
        let mut store = MemoryKvStore::new();
        store.insert_raw("k", "{\"moods\": [");

        assert_eq!(store.load("k"), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = MemoryKvStore::new();
        store.save("k", &json!(1)).unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert_eq!(store.load("k"), None);
        assert_eq!(store.used_bytes(), 0);
    }
}
