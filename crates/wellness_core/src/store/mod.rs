//! Key-value persistence for JSON blobs.
//!
//! # Responsibility
//! - Define the store contract used by stateful dashboard components.
//! - Enforce a byte capacity on the whole store, the way browser local
//!   storage does per origin.
//!
//! # Invariants
//! - `save` never leaves a partially written value behind.
//! - `load` never fails: absent keys, unreadable rows and corrupt payloads all
//!   read as `None`.
//! - Footprint is the sum of UTF-8 key and value bytes over all keys.

use crate::db::DbError;
use log::warn;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryKvStore;
pub use sqlite_store::SqliteKvStore;

/// Default store capacity, matching the common 5 MiB local storage budget.
pub const DEFAULT_CAPACITY_BYTES: u64 = 5 * 1024 * 1024;

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-side store failure.
#[derive(Debug)]
pub enum StoreError {
    /// The write would grow the store beyond its capacity.
    QuotaExceeded {
        key: String,
        required_bytes: u64,
        capacity_bytes: u64,
    },
    /// Value could not be encoded as JSON text.
    Serialize(serde_json::Error),
    Db(DbError),
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Serialize(_) => "serialize_failed",
            Self::Db(err) => err.code(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                capacity_bytes,
            } => write!(
                f,
                "store quota exceeded writing `{key}`: {required_bytes} bytes required, capacity {capacity_bytes}"
            ),
            Self::Serialize(err) => write!(f, "failed to encode store value: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Serialize(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Key-value store holding one JSON document per key.
pub trait KeyValueStore {
    /// Writes `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &Value) -> StoreResult<()>;

    /// Reads the value under `key`.
    ///
    /// Returns `None` when nothing was stored or the stored payload cannot
    /// be decoded.
    fn load(&self, key: &str) -> Option<Value>;

    /// Deletes `key`. Deleting an absent key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn save(&mut self, key: &str, value: &Value) -> StoreResult<()> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> Option<Value> {
        (**self).load(key)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

pub(crate) fn encode_payload(value: &Value) -> StoreResult<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn decode_payload(key: &str, raw: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                "event=store_load module=store status=corrupt key={} bytes={} error={}",
                key,
                raw.len(),
                err
            );
            None
        }
    }
}

pub(crate) fn entry_footprint(key: &str, raw: &str) -> u64 {
    (key.len() + raw.len()) as u64
}

pub(crate) fn check_capacity(
    key: &str,
    other_bytes: u64,
    raw: &str,
    capacity_bytes: u64,
) -> StoreResult<()> {
    let required_bytes = other_bytes + entry_footprint(key, raw);
    if required_bytes > capacity_bytes {
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            required_bytes,
            capacity_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_capacity, decode_payload, StoreError};

    #[test]
    fn decode_payload_rejects_invalid_json() {
        assert!(decode_payload("k", "{not json").is_none());
        assert_eq!(
            decode_payload("k", r#"{"a":1}"#).expect("valid json")["a"],
            1
        );
    }

    #[test]
    fn check_capacity_counts_key_and_other_entries() {
        assert!(check_capacity("ab", 10, "cdef", 16).is_ok());

        let err = check_capacity("ab", 11, "cdef", 16).expect_err("17 bytes > 16");
        assert!(err.is_quota_exceeded());
        match err {
            StoreError::QuotaExceeded {
                required_bytes,
                capacity_bytes,
                ..
            } => {
                assert_eq!(required_bytes, 17);
                assert_eq!(capacity_bytes, 16);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
