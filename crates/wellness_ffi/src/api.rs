//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose dashboard use cases to Dart via FRB.
//! - Own the single dashboard session of this process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized through one mutex; a poisoned lock is recovered,
//!   never propagated.
//! - No environment variables are read; the host passes the database path.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use log::warn;
use std::sync::{Mutex, MutexGuard};
use wellness_core::service::chat_service::Sender;
use wellness_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_db,
    ping as ping_inner, BannerPhase, Dashboard, DashboardConfig, DashboardEvent,
    MoodHistoryView, SqliteKvStore,
};

static SESSION: Mutex<Option<Dashboard<SqliteKvStore>>> = Mutex::new(None);

const SESSION_CLOSED: &str = "Dashboard is not open.";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic result envelope for commands without a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardActionResponse {
    pub ok: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl DashboardActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodLogResponse {
    pub ok: bool,
    pub message: String,
    pub mood: Option<String>,
    pub icon: Option<String>,
    /// Whether the updated list reached the store.
    pub durable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodHistoryItem {
    pub mood: String,
    pub icon: String,
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodHistoryResponse {
    pub ok: bool,
    /// Placeholder text when `items` is empty, otherwise a summary.
    pub message: String,
    pub items: Vec<MoodHistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageItem {
    pub id: String,
    pub text: String,
    pub from_bot: bool,
    pub timestamp_epoch_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSendResponse {
    pub ok: bool,
    pub message: String,
    pub user_message: Option<ChatMessageItem>,
    /// When the host should tick to receive the bot reply.
    pub reply_due_epoch_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerItem {
    pub id: u64,
    pub message: String,
    pub fading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardTickResponse {
    pub ok: bool,
    pub message: String,
    /// Bot messages delivered by this tick, in delivery order.
    pub bot_messages: Vec<ChatMessageItem>,
    /// Banners still on screen after this tick.
    pub banners: Vec<BannerItem>,
    pub next_due_epoch_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomAnalysisResponse {
    pub ok: bool,
    pub message: String,
    pub selected: Vec<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub recommendations: Vec<String>,
    pub emergency: bool,
}

impl SymptomAnalysisResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            selected: Vec::new(),
            condition: None,
            description: None,
            recommendations: Vec::new(),
            emergency: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlanResponse {
    pub ok: bool,
    pub message: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
    pub calories: String,
}

impl MealPlanResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            breakfast: String::new(),
            lunch: String::new(),
            dinner: String::new(),
            snacks: String::new(),
            calories: String::new(),
        }
    }
}

/// Opens (or reopens) the process dashboard session.
///
/// Input semantics:
/// - `db_path`: SQLite file backing the mood log; created when missing.
/// - `config_json`: JSON object of config overrides; blank means defaults.
///
/// # FFI contract
/// - Sync call; performs file-system and SQLite setup.
/// - Replaces any previously open session.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_open(db_path: String, config_json: String) -> DashboardActionResponse {
    let db_path = db_path.trim();
    if db_path.is_empty() {
        return DashboardActionResponse::failure("dashboard_open failed: db_path is empty");
    }
    let config = match DashboardConfig::from_json(&config_json) {
        Ok(config) => config,
        Err(err) => {
            return DashboardActionResponse::failure(format!("dashboard_open failed: {err}"))
        }
    };
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            return DashboardActionResponse::failure(format!("dashboard_open failed: {err}"))
        }
    };

    let store = SqliteKvStore::with_capacity(conn, config.storage_capacity_bytes);
    let dashboard = Dashboard::open(store, config);
    let restored = dashboard.moods().len();
    *lock_session() = Some(dashboard);
    DashboardActionResponse::success(format!("Dashboard opened with {restored} mood log(s)."))
}

/// Drops the process dashboard session.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_close() -> DashboardActionResponse {
    match lock_session().take() {
        Some(_) => DashboardActionResponse::success("Dashboard closed."),
        None => DashboardActionResponse::failure(SESSION_CLOSED),
    }
}

/// Logs a mood.
///
/// `at_epoch_ms` pins the entry time; `None` uses the current local time.
///
/// # FFI contract
/// - Rejected input returns `ok=false` with the user-facing reason.
/// - `durable=false` means the entry is shown but was not persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_log(mood: String, at_epoch_ms: Option<i64>) -> MoodLogResponse {
    let rejected = |message: String| MoodLogResponse {
        ok: false,
        message,
        mood: None,
        icon: None,
        durable: false,
    };

    let now = match resolve_time(at_epoch_ms) {
        Ok(now) => now,
        Err(message) => return rejected(message),
    };
    let result =
        with_session(|dashboard| dashboard.log_mood(&mood, now).map_err(|err| err.to_string()));
    match result {
        Ok(logged) => MoodLogResponse {
            ok: true,
            message: format!("Mood logged: {}", logged.entry.mood()),
            mood: Some(logged.entry.mood().to_string()),
            icon: Some(logged.entry.icon().to_string()),
            durable: logged.persisted.is_durable(),
        },
        Err(message) => rejected(message),
    }
}

/// Renders mood history rows relative to `now_epoch_ms` (or now).
#[flutter_rust_bridge::frb(sync)]
pub fn mood_history(now_epoch_ms: Option<i64>) -> MoodHistoryResponse {
    let result = resolve_time(now_epoch_ms)
        .and_then(|now| with_session(|dashboard| Ok(dashboard.mood_history(now))));
    match result {
        Ok(MoodHistoryView::Empty { message }) => MoodHistoryResponse {
            ok: true,
            message: message.to_string(),
            items: Vec::new(),
        },
        Ok(MoodHistoryView::Entries(rows)) => MoodHistoryResponse {
            ok: true,
            message: format!("{} mood log(s).", rows.len()),
            items: rows
                .into_iter()
                .map(|row| MoodHistoryItem {
                    mood: row.mood,
                    icon: row.icon.to_string(),
                    time_label: row.time_label,
                })
                .collect(),
        },
        Err(message) => MoodHistoryResponse {
            ok: false,
            message,
            items: Vec::new(),
        },
    }
}

/// Sends a chat message; the reply arrives through `dashboard_tick`.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_send(text: String, at_epoch_ms: Option<i64>) -> ChatSendResponse {
    let result = resolve_time(at_epoch_ms).and_then(|now| {
        with_session(|dashboard| {
            let ticket = dashboard
                .send_message(&text, now)
                .map_err(|err| err.to_string())?;
            let user_message = dashboard
                .messages()
                .iter()
                .find(|message| message.id == ticket.user_message_id)
                .map(to_chat_item);
            Ok((user_message, ticket.due_at.timestamp_millis()))
        })
    });
    match result {
        Ok((user_message, due)) => ChatSendResponse {
            ok: true,
            message: "Message sent.".to_string(),
            user_message,
            reply_due_epoch_ms: Some(due),
        },
        Err(message) => ChatSendResponse {
            ok: false,
            message,
            user_message: None,
            reply_due_epoch_ms: None,
        },
    }
}

/// Applies every deferred effect due at `now_epoch_ms` (or now).
///
/// # FFI contract
/// - Hosts call this from their event loop, ideally at `next_due_epoch_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_tick(now_epoch_ms: Option<i64>) -> DashboardTickResponse {
    let result = resolve_time(now_epoch_ms).and_then(|now| {
        with_session(|dashboard| {
            let events = dashboard.tick(now);
            let bot_messages = events
                .iter()
                .filter_map(|event| match event {
                    DashboardEvent::BotReplied { message_id } => dashboard
                        .messages()
                        .iter()
                        .find(|message| message.id == *message_id)
                        .map(to_chat_item),
                    _ => None,
                })
                .collect::<Vec<_>>();
            let banners = dashboard
                .banners()
                .iter()
                .map(|banner| BannerItem {
                    id: banner.id,
                    message: banner.message.clone(),
                    fading: banner.phase == BannerPhase::FadingOut,
                })
                .collect::<Vec<_>>();
            let next_due = dashboard.next_due().map(|due| due.timestamp_millis());
            Ok((events.len(), bot_messages, banners, next_due))
        })
    });
    match result {
        Ok((applied, bot_messages, banners, next_due_epoch_ms)) => DashboardTickResponse {
            ok: true,
            message: format!("Applied {applied} event(s)."),
            bot_messages,
            banners,
            next_due_epoch_ms,
        },
        Err(message) => DashboardTickResponse {
            ok: false,
            message,
            bot_messages: Vec::new(),
            banners: Vec::new(),
            next_due_epoch_ms: None,
        },
    }
}

/// Toggles one symptom tag; the message reports the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn symptom_toggle(tag: String) -> DashboardActionResponse {
    match with_session(|dashboard| Ok(dashboard.toggle_symptom(&tag))) {
        Ok(true) => DashboardActionResponse::success("selected"),
        Ok(false) => DashboardActionResponse::success("unselected"),
        Err(message) => DashboardActionResponse::failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn symptom_clear() -> DashboardActionResponse {
    match with_session(|dashboard| {
        dashboard.symptoms_mut().clear();
        Ok(())
    }) {
        Ok(()) => DashboardActionResponse::success("Selection cleared."),
        Err(message) => DashboardActionResponse::failure(message),
    }
}

/// Analyzes the selected symptoms.
#[flutter_rust_bridge::frb(sync)]
pub fn symptom_analyze() -> SymptomAnalysisResponse {
    let result = with_session(|dashboard| {
        let selected = dashboard.symptoms().selected_labels();
        let diagnosis = dashboard
            .analyze_symptoms()
            .map_err(|err| err.to_string())?;
        Ok((selected, diagnosis))
    });
    match result {
        Ok((selected, diagnosis)) => SymptomAnalysisResponse {
            ok: true,
            message: "Analysis complete.".to_string(),
            selected,
            condition: Some(diagnosis.condition.to_string()),
            description: Some(diagnosis.description.to_string()),
            recommendations: diagnosis
                .recommendations
                .iter()
                .map(|item| item.to_string())
                .collect(),
            emergency: diagnosis.emergency,
        },
        Err(message) => SymptomAnalysisResponse::failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn meal_select_goal(goal: String) -> DashboardActionResponse {
    match with_session(|dashboard| {
        dashboard.meals_mut().select_goal(&goal);
        Ok(())
    }) {
        Ok(()) => DashboardActionResponse::success("Goal selected."),
        Err(message) => DashboardActionResponse::failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn meal_select_preference(preference: String) -> DashboardActionResponse {
    match with_session(|dashboard| {
        dashboard.meals_mut().select_preference(&preference);
        Ok(())
    }) {
        Ok(()) => DashboardActionResponse::success("Preference selected."),
        Err(message) => DashboardActionResponse::failure(message),
    }
}

/// Generates a meal plan from the current goal and preference.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_generate() -> MealPlanResponse {
    let result =
        with_session(|dashboard| dashboard.generate_meal_plan().map_err(|err| err.to_string()));
    match result {
        Ok(plan) => MealPlanResponse {
            ok: true,
            message: "Meal plan ready.".to_string(),
            breakfast: plan.breakfast,
            lunch: plan.lunch,
            dinner: plan.dinner,
            snacks: plan.snacks,
            calories: plan.calories,
        },
        Err(message) => MealPlanResponse::failure(message),
    }
}

fn lock_session() -> MutexGuard<'static, Option<Dashboard<SqliteKvStore>>> {
    SESSION.lock().unwrap_or_else(|poisoned| {
        warn!("event=session_lock module=ffi status=recovered");
        poisoned.into_inner()
    })
}

fn with_session<T>(
    f: impl FnOnce(&mut Dashboard<SqliteKvStore>) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = lock_session();
    let dashboard = guard.as_mut().ok_or_else(|| SESSION_CLOSED.to_string())?;
    f(dashboard)
}

fn resolve_time(epoch_ms: Option<i64>) -> Result<DateTime<FixedOffset>, String> {
    match epoch_ms {
        None => Ok(Local::now().fixed_offset()),
        Some(ms) => Local
            .timestamp_millis_opt(ms)
            .single()
            .map(|at| at.fixed_offset())
            .ok_or_else(|| format!("timestamp {ms} is out of range")),
    }
}

fn to_chat_item(message: &wellness_core::service::chat_service::ChatMessage) -> ChatMessageItem {
    ChatMessageItem {
        id: message.id.to_string(),
        text: message.text.clone(),
        from_bot: message.sender == Sender::Bot,
        timestamp_epoch_ms: message.timestamp.timestamp_millis(),
    }
}
