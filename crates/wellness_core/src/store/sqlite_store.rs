//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist JSON blobs in `kv_entries` so they survive process restarts.
//! - Reject writes that would exceed the configured capacity.
//!
//! # Invariants
//! - Capacity check and write happen in one transaction.
//! - Values are stored as JSON text; decoding happens on read.

use super::{
    check_capacity, decode_payload, encode_payload, KeyValueStore, StoreResult,
    DEFAULT_CAPACITY_BYTES,
};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

const OTHER_ENTRIES_BYTES_SQL: &str = "SELECT COALESCE(
        SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))),
        0
    )
    FROM kv_entries
    WHERE key != ?1;";

/// Store owning one migrated SQLite connection.
///
/// Build the connection with [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`] so the schema is present.
pub struct SqliteKvStore {
    conn: Connection,
    capacity_bytes: u64,
}

impl SqliteKvStore {
    pub fn new(conn: Connection) -> Self {
        Self::with_capacity(conn, DEFAULT_CAPACITY_BYTES)
    }

    pub fn with_capacity(conn: Connection, capacity_bytes: u64) -> Self {
        Self {
            conn,
            capacity_bytes,
        }
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    /// Read-only access for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn read_raw(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }
}

impl KeyValueStore for SqliteKvStore {
    fn save(&mut self, key: &str, value: &Value) -> StoreResult<()> {
        let raw = encode_payload(value)?;

        let tx = self.conn.transaction()?;
        let other_bytes: i64 = tx.query_row(OTHER_ENTRIES_BYTES_SQL, [key], |row| row.get(0))?;
        check_capacity(key, other_bytes.max(0) as u64, &raw, self.capacity_bytes)?;

        tx.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, raw.as_str()],
        )?;
        tx.commit()?;

        debug!(
            "event=store_save module=store status=ok key={} bytes={}",
            key,
            raw.len()
        );
        Ok(())
    }

    fn load(&self, key: &str) -> Option<Value> {
        match self.read_raw(key) {
            Ok(Some(raw)) => decode_payload(key, &raw),
            Ok(None) => None,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error key={} error={}",
                    key, err
                );
                None
            }
        }
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
