//! Core logic for the wellness dashboard.
//! Mood log persistence, the shared rule engine and per-feature session
//! state live here; UI layers only render what this crate returns.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod rules;
pub mod schedule;
pub mod service;
pub mod store;

pub use config::{ConfigError, DashboardConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::input::InputError;
pub use model::mood::{Mood, MoodEntry, MoodSnapshot, MOODS_STORAGE_KEY};
pub use rules::meal::{meal_plan, MealPlan};
pub use rules::responder::respond;
pub use rules::symptom::{diagnose, Diagnosis};
pub use rules::{RuleSet, TagSelection};
pub use schedule::{DeferredQueue, TaskId};
pub use service::dashboard::{Banner, BannerPhase, Dashboard, DashboardEvent, ReplyTicket};
pub use service::mood_service::{MoodHistoryView, MoodLog, PersistOutcome};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Health check used by host bindings.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
