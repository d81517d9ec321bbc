//! Mood log domain model.
//!
//! # Responsibility
//! - Define the mood vocabulary and its display icons.
//! - Define the persisted entry and snapshot shapes.
//!
//! # Invariants
//! - `MoodEntry::date` is the calendar date of `timestamp` in the offset the
//!   timestamp was recorded with.
//! - Entries are immutable once created.
//! - Snapshot wire shape is `{"moods": [{mood, timestamp, date}, ...]}`.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key under which the mood snapshot lives.
pub const MOODS_STORAGE_KEY: &str = "mentalHealthMoods";

/// Icon used for labels outside the vocabulary.
pub const NEUTRAL_MOOD_ICON: &str = "😐";

/// Fixed mood vocabulary offered by the mood buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Sad,
    Stressed,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Great,
        Mood::Good,
        Mood::Okay,
        Mood::Sad,
        Mood::Stressed,
    ];

    /// Wire label, also used as the button tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Sad => "sad",
            Self::Stressed => "stressed",
        }
    }

    /// Parses an exact wire label. Labels are case-sensitive tags.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mood| mood.as_str() == label)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Great => "😊",
            Self::Good => "🙂",
            Self::Okay => "😐",
            Self::Sad => "😢",
            Self::Stressed => "😰",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon for any stored label; unknown labels fall back to neutral.
pub fn mood_icon(label: &str) -> &'static str {
    Mood::parse(label).map_or(NEUTRAL_MOOD_ICON, Mood::icon)
}

/// Validation error for entries decoded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodValidationError {
    EmptyMood,
    DateMismatch {
        timestamp: DateTime<FixedOffset>,
        date: NaiveDate,
    },
}

impl Display for MoodValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMood => write!(f, "mood label must not be empty"),
            Self::DateMismatch { timestamp, date } => write!(
                f,
                "date {date} does not match timestamp {}",
                timestamp.to_rfc3339()
            ),
        }
    }
}

impl Error for MoodValidationError {}

/// One logged mood.
///
/// `mood` stays a plain label so entries written with labels this build does
/// not know still round-trip through storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    mood: String,
    timestamp: DateTime<FixedOffset>,
    date: NaiveDate,
}

impl MoodEntry {
    /// Creates an entry recorded at `at`; `date` is derived from it.
    pub fn new(mood: Mood, at: DateTime<FixedOffset>) -> Self {
        Self {
            mood: mood.as_str().to_string(),
            date: at.date_naive(),
            timestamp: at,
        }
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn icon(&self) -> &'static str {
        mood_icon(&self.mood)
    }

    /// Checks invariants that a decoded entry may violate.
    pub fn validate(&self) -> Result<(), MoodValidationError> {
        if self.mood.trim().is_empty() {
            return Err(MoodValidationError::EmptyMood);
        }
        if self.timestamp.date_naive() != self.date {
            return Err(MoodValidationError::DateMismatch {
                timestamp: self.timestamp,
                date: self.date,
            });
        }
        Ok(())
    }
}

/// Whole-list persisted snapshot, newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSnapshot {
    pub moods: Vec<MoodEntry>,
}

#[cfg(test)]
mod tests {
    use super::{mood_icon, Mood, MoodEntry, MoodValidationError, NEUTRAL_MOOD_ICON};
    use chrono::{DateTime, NaiveDate};

    #[test]
    fn entry_date_follows_recording_offset() {
        // 23:30 at -05:00 is already the next day in UTC.
        let at = DateTime::parse_from_rfc3339("2026-03-01T23:30:00-05:00").unwrap();
        let entry = MoodEntry::new(Mood::Sad, at);

        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let at = DateTime::parse_from_rfc3339("2026-03-01T10:00:00+02:00").unwrap();
        let json = serde_json::to_value(MoodEntry::new(Mood::Great, at)).unwrap();

        assert_eq!(json["mood"], "great");
        assert_eq!(json["timestamp"], "2026-03-01T10:00:00+02:00");
        assert_eq!(json["date"], "2026-03-01");
    }

    #[test]
    fn legacy_utc_entry_decodes() {
        let entry: MoodEntry = serde_json::from_str(
            r#"{"mood":"okay","timestamp":"2025-12-31T08:15:30.123Z","date":"2025-12-31"}"#,
        )
        .unwrap();

        assert_eq!(entry.mood(), "okay");
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_date() {
        let entry: MoodEntry = serde_json::from_str(
            r#"{"mood":"okay","timestamp":"2025-12-31T08:15:30Z","date":"2025-12-30"}"#,
        )
        .unwrap();

        assert!(matches!(
            entry.validate(),
            Err(MoodValidationError::DateMismatch { .. })
        ));
    }

    #[test]
    fn unknown_labels_use_neutral_icon() {
        assert_eq!(mood_icon("great"), "😊");
        assert_eq!(mood_icon("stressed"), "😰");
        assert_eq!(mood_icon("ecstatic"), NEUTRAL_MOOD_ICON);
        assert_eq!(mood_icon("Great"), NEUTRAL_MOOD_ICON);
    }
}
