//! Mood log use-case service.
//!
//! # Responsibility
//! - Own the newest-first list of mood entries for one session.
//! - Mirror the whole list into the key-value store after every mutation.
//! - Project entries into display rows with icons and age labels.
//!
//! # Invariants
//! - Order is insertion order, newest first; entries are never re-sorted.
//! - A rejected snapshot is trimmed to the newest `retain_after_quota`
//!   entries and written exactly once more.
//! - Persistence failures are logged, never returned to the caller as
//!   errors. Callers get a [`PersistOutcome`] instead.
//! - Restoring never fails: any unreadable shape becomes an empty log.
//! - Restore keeps every item that decodes, even one whose `date` disagrees
//!   with its timestamp. Items that do not decode or carry an empty label
//!   are dropped, and the next persist removes them from the store for good.

use crate::config::DEFAULT_QUOTA_RETAIN_ENTRIES;
use crate::model::input::InputError;
use crate::model::mood::{Mood, MoodEntry, MoodValidationError, MOODS_STORAGE_KEY};
use crate::service::relative_time::format_relative;
use crate::store::{KeyValueStore, StoreResult};
use chrono::{DateTime, FixedOffset, Local};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;

/// Placeholder shown when nothing has been logged yet.
pub const EMPTY_HISTORY_MESSAGE: &str = "No mood logs yet. Start tracking your mood above!";

/// Durable lifecycle state of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodLogState {
    Empty,
    Populated,
}

/// Result of mirroring the list into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Snapshot written as is.
    Saved,
    /// Store rejected the full list; the oldest `evicted` entries were
    /// dropped and the trimmed list was written.
    SavedAfterTruncation { evicted: usize },
    /// Snapshot could not be written; `code` is the store error code.
    Failed { code: &'static str },
}

impl PersistOutcome {
    /// Whether the in-memory list now matches the store.
    pub fn is_durable(self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Returned by [`MoodLog::log_mood_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodLogged {
    pub entry: MoodEntry,
    pub persisted: PersistOutcome,
}

/// One rendered history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodHistoryRow {
    pub mood: String,
    pub icon: &'static str,
    pub time_label: String,
}

/// Rendered history container content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodHistoryView {
    Empty { message: &'static str },
    Entries(Vec<MoodHistoryRow>),
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    moods: &'a VecDeque<MoodEntry>,
}

/// Session-owned mood log bound to one store.
pub struct MoodLog<S: KeyValueStore> {
    store: S,
    entries: VecDeque<MoodEntry>,
    retain_after_quota: usize,
}

impl<S: KeyValueStore> MoodLog<S> {
    /// Creates an empty log without reading the store.
    pub fn new(store: S) -> Self {
        Self::with_retain_limit(store, DEFAULT_QUOTA_RETAIN_ENTRIES)
    }

    pub fn with_retain_limit(store: S, retain_after_quota: usize) -> Self {
        Self {
            store,
            entries: VecDeque::new(),
            retain_after_quota: retain_after_quota.max(1),
        }
    }

    /// Creates a log and restores previously persisted entries.
    pub fn open(store: S, retain_after_quota: usize) -> Self {
        let mut log = Self::with_retain_limit(store, retain_after_quota);
        log.restore();
        log
    }

    /// Replaces in-memory entries with the stored snapshot.
    ///
    /// Returns the number of entries restored.
    pub fn restore(&mut self) -> usize {
        self.entries = match self.store.load(MOODS_STORAGE_KEY) {
            Some(value) => decode_snapshot(value),
            None => VecDeque::new(),
        };
        info!(
            "event=mood_restore module=mood status=ok entries={}",
            self.entries.len()
        );
        self.entries.len()
    }

    /// Logs `label` at the current local time.
    pub fn log_mood(&mut self, label: &str) -> Result<MoodLogged, InputError> {
        let now: DateTime<FixedOffset> = Local::now().into();
        self.log_mood_at(label, now)
    }

    /// Logs `label` as recorded at `at`, then persists the list.
    ///
    /// # Errors
    /// - `EmptyMood` for a blank label.
    /// - `UnknownMood` for labels outside the vocabulary.
    ///
    /// Neither error mutates the log.
    pub fn log_mood_at(
        &mut self,
        label: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<MoodLogged, InputError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(InputError::EmptyMood);
        }
        let mood = Mood::parse(label).ok_or_else(|| InputError::UnknownMood(label.to_string()))?;

        let entry = MoodEntry::new(mood, at);
        self.entries.push_front(entry.clone());
        let persisted = self.persist();
        info!(
            "event=mood_log module=mood status=ok mood={} entries={} durable={}",
            mood,
            self.entries.len(),
            persisted.is_durable()
        );

        Ok(MoodLogged { entry, persisted })
    }

    /// Writes the whole list to the store, trimming once on quota errors.
    pub fn persist(&mut self) -> PersistOutcome {
        let err = match self.save_snapshot() {
            Ok(()) => return PersistOutcome::Saved,
            Err(err) => err,
        };

        if !err.is_quota_exceeded() {
            error!(
                "event=mood_persist module=mood status=error error_code={} error={}",
                err.code(),
                err
            );
            return PersistOutcome::Failed { code: err.code() };
        }

        let before = self.entries.len();
        self.entries.truncate(self.retain_after_quota);
        let evicted = before - self.entries.len();
        warn!(
            "event=mood_persist module=mood status=retry error_code={} evicted={} retained={}",
            err.code(),
            evicted,
            self.entries.len()
        );

        match self.save_snapshot() {
            Ok(()) => PersistOutcome::SavedAfterTruncation { evicted },
            Err(retry_err) => {
                error!(
                    "event=mood_persist module=mood status=error stage=retry error_code={} error={}",
                    retry_err.code(),
                    retry_err
                );
                PersistOutcome::Failed {
                    code: retry_err.code(),
                }
            }
        }
    }

    /// Empties the log and deletes its stored snapshot.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.entries.clear();
        self.store.remove(MOODS_STORAGE_KEY)?;
        info!("event=mood_clear module=mood status=ok");
        Ok(())
    }

    /// Renders display rows with ages measured at `now`.
    pub fn render(&self, now: DateTime<FixedOffset>) -> MoodHistoryView {
        if self.entries.is_empty() {
            return MoodHistoryView::Empty {
                message: EMPTY_HISTORY_MESSAGE,
            };
        }

        MoodHistoryView::Entries(
            self.entries
                .iter()
                .map(|entry| MoodHistoryRow {
                    mood: entry.mood().to_string(),
                    icon: entry.icon(),
                    time_label: format_relative(entry.timestamp(), now),
                })
                .collect(),
        )
    }

    pub fn state(&self) -> MoodLogState {
        if self.entries.is_empty() {
            MoodLogState::Empty
        } else {
            MoodLogState::Populated
        }
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &MoodEntry> + '_ {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&MoodEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands the store back, e.g. to reopen a log over the same data.
    pub fn into_store(self) -> S {
        self.store
    }

    fn save_snapshot(&mut self) -> StoreResult<()> {
        let snapshot = serde_json::to_value(SnapshotRef {
            moods: &self.entries,
        })?;
        self.store.save(MOODS_STORAGE_KEY, &snapshot)
    }
}

fn decode_snapshot(value: Value) -> VecDeque<MoodEntry> {
    let Value::Object(mut root) = value else {
        warn!("event=mood_restore module=mood status=coerced reason=root_not_object");
        return VecDeque::new();
    };

    let items = match root.remove("moods") {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return VecDeque::new(),
        Some(_) => {
            warn!("event=mood_restore module=mood status=coerced reason=moods_not_list");
            return VecDeque::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let entry = match serde_json::from_value::<MoodEntry>(item) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        "event=mood_restore module=mood status=skipped index={} error={}",
                        index, err
                    );
                    return None;
                }
            };
            match entry.validate() {
                Ok(()) => Some(entry),
                Err(err @ MoodValidationError::DateMismatch { .. }) => {
                    warn!(
                        "event=mood_restore module=mood status=kept index={} error={}",
                        index, err
                    );
                    Some(entry)
                }
                Err(err) => {
                    warn!(
                        "event=mood_restore module=mood status=skipped index={} error={}",
                        index, err
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, MoodHistoryView, MoodLog, MoodLogState, PersistOutcome};
    use crate::db::DbError;
    use crate::model::input::InputError;
    use crate::store::{KeyValueStore, MemoryKvStore, StoreError, StoreResult};
    use chrono::{DateTime, Duration, FixedOffset};
    use serde_json::{json, Value};

    /// Store whose every write fails with a database error.
    #[derive(Default)]
    struct BrokenDbStore {
        saves: usize,
    }

    impl KeyValueStore for BrokenDbStore {
        fn save(&mut self, _key: &str, _value: &Value) -> StoreResult<()> {
            self.saves += 1;
            Err(StoreError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery)))
        }

        fn load(&self, _key: &str) -> Option<Value> {
            None
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    fn t0() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-04-02T09:00:00+01:00").unwrap()
    }

    #[test]
    fn rejected_input_does_not_mutate_state() {
        let mut log = MoodLog::new(MemoryKvStore::new());

        assert_eq!(log.log_mood_at("  ", t0()), Err(InputError::EmptyMood));
        assert_eq!(
            log.log_mood_at("elated", t0()),
            Err(InputError::UnknownMood("elated".to_string()))
        );
        assert_eq!(log.state(), MoodLogState::Empty);
        assert!(log.store().raw("mentalHealthMoods").is_none());
    }

    #[test]
    fn entries_are_newest_first_by_insertion_not_timestamp() {
        let mut log = MoodLog::new(MemoryKvStore::new());
        log.log_mood_at("good", t0()).unwrap();
        // Older timestamp logged later still goes to the head.
        log.log_mood_at("sad", t0() - Duration::days(1)).unwrap();

        let moods: Vec<&str> = log.entries().map(|entry| entry.mood()).collect();
        assert_eq!(moods, vec!["sad", "good"]);
        assert_eq!(log.state(), MoodLogState::Populated);
    }

    #[test]
    fn failed_retry_keeps_entry_in_memory() {
        // Capacity 0 rejects every write, including the retry path; the
        // outcome must still be a value, not a panic or error.
        let mut log = MoodLog::with_retain_limit(MemoryKvStore::with_capacity(0), 1);
        let logged = log.log_mood_at("okay", t0()).unwrap();

        assert_eq!(
            logged.persisted,
            PersistOutcome::Failed {
                code: "quota_exceeded"
            }
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn database_failure_is_not_retried_or_truncated() {
        let mut log = MoodLog::with_retain_limit(BrokenDbStore::default(), 1);

        for (offset, mood) in ["good", "sad", "great"].into_iter().enumerate() {
            let logged = log
                .log_mood_at(mood, t0() + Duration::minutes(offset as i64))
                .unwrap();
            assert_eq!(logged.persisted, PersistOutcome::Failed { code: "db_failed" });
            assert_eq!(log.store().saves, offset + 1);
        }

        let moods: Vec<&str> = log.entries().map(|entry| entry.mood()).collect();
        assert_eq!(moods, vec!["great", "sad", "good"]);
    }

    #[test]
    fn decode_snapshot_coerces_bad_shapes_to_empty() {
        assert!(decode_snapshot(json!([1, 2])).is_empty());
        assert!(decode_snapshot(json!({})).is_empty());
        assert!(decode_snapshot(json!({"moods": null})).is_empty());
        assert!(decode_snapshot(json!({"moods": "great"})).is_empty());
    }

    #[test]
    fn decode_snapshot_skips_undecodable_items_and_keeps_date_mismatches() {
        let entries = decode_snapshot(json!({
            "moods": [
                {"mood": "great", "timestamp": "2026-04-02T09:00:00+01:00", "date": "2026-04-02"},
                {"mood": "sad"},
                {"mood": " ", "timestamp": "2026-04-01T10:00:00+01:00", "date": "2026-04-01"},
                {"mood": "okay", "timestamp": "2026-04-01T09:00:00+01:00", "date": "2026-03-30"},
                {"mood": "calm", "timestamp": "2026-03-31T09:00:00+01:00", "date": "2026-03-31"}
            ]
        }));

        let moods: Vec<&str> = entries.iter().map(|entry| entry.mood()).collect();
        assert_eq!(moods, vec!["great", "okay", "calm"]);
    }

    #[test]
    fn render_empty_and_populated() {
        let mut log = MoodLog::new(MemoryKvStore::new());
        assert!(matches!(
            log.render(t0()),
            MoodHistoryView::Empty { message } if message.starts_with("No mood logs yet")
        ));

        log.log_mood_at("stressed", t0()).unwrap();
        match log.render(t0() + Duration::minutes(5)) {
            MoodHistoryView::Entries(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].mood, "stressed");
                assert_eq!(rows[0].icon, "😰");
                assert_eq!(rows[0].time_label, "5 minutes ago");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn clear_removes_snapshot() {
        let mut log = MoodLog::new(MemoryKvStore::new());
        log.log_mood_at("good", t0()).unwrap();
        assert!(log.store().raw("mentalHealthMoods").is_some());

        log.clear().unwrap();
        assert!(log.is_empty());
        assert!(log.store().raw("mentalHealthMoods").is_none());
    }
}
