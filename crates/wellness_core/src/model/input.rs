//! Rejections for user intents that carry no usable input.
//!
//! Every variant is raised before any state is mutated.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Chat message is empty after trimming.
    EmptyMessage,
    /// Mood button carried no label.
    EmptyMood,
    /// Mood label is outside the vocabulary.
    UnknownMood(String),
    /// Analyze requested with no symptom selected.
    NoSymptomsSelected,
    /// Generate requested without both a goal and a dietary preference.
    IncompleteMealSelection,
}

impl InputError {
    /// Stable machine-readable code for UI envelopes and log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty_message",
            Self::EmptyMood => "empty_mood",
            Self::UnknownMood(_) => "unknown_mood",
            Self::NoSymptomsSelected => "no_symptoms_selected",
            Self::IncompleteMealSelection => "incomplete_meal_selection",
        }
    }
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "Please enter a message"),
            Self::EmptyMood => write!(f, "Please choose a mood"),
            Self::UnknownMood(label) => write!(f, "Unknown mood: `{label}`"),
            Self::NoSymptomsSelected => write!(f, "Please select at least one symptom"),
            Self::IncompleteMealSelection => {
                write!(f, "Please select both a goal and dietary preference")
            }
        }
    }
}

impl Error for InputError {}
