//! Symptom-to-recommendation table.

use super::{has_all, has_any, RuleSet, TagSelection};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Tags that always produce the emergency diagnosis.
pub const EMERGENCY_SYMPTOMS: &[&str] = &["chest-pain", "breathing"];

/// Diagnosis card shown after analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnosis {
    pub condition: &'static str,
    pub description: &'static str,
    pub recommendations: &'static [&'static str],
    /// Gates the separate emergency warning panel.
    pub emergency: bool,
}

pub const EMERGENCY_DIAGNOSIS: Diagnosis = Diagnosis {
    condition: "Emergency Symptoms Detected",
    description: "You have symptoms that may require immediate medical attention.",
    recommendations: &[
        "Call emergency services immediately (108)",
        "Do not drive yourself to the hospital",
        "Stay calm and sit in a comfortable position",
        "Have someone stay with you",
    ],
    emergency: true,
};

pub const RESPIRATORY_DIAGNOSIS: Diagnosis = Diagnosis {
    condition: "Possible Respiratory Infection",
    description: "Your symptoms suggest a respiratory infection like flu or cold.",
    recommendations: &[
        "Rest and stay hydrated",
        "Take paracetamol for fever",
        "Consult a doctor if fever persists for more than 3 days",
        "Wear a mask to prevent spreading",
        "Monitor your temperature regularly",
    ],
    emergency: false,
};

pub const DIGESTIVE_DIAGNOSIS: Diagnosis = Diagnosis {
    condition: "Possible Digestive Issue",
    description: "Your symptoms indicate a digestive problem.",
    recommendations: &[
        "Avoid spicy and oily foods",
        "Drink plenty of water",
        "Eat light, bland foods",
        "Consult a doctor if pain is severe",
        "Consider ORS for hydration",
    ],
    emergency: false,
};

pub const MIGRAINE_DIAGNOSIS: Diagnosis = Diagnosis {
    condition: "Possible Migraine or Dehydration",
    description: "Your symptoms could be due to migraine, dehydration, or stress.",
    recommendations: &[
        "Rest in a dark, quiet room",
        "Drink plenty of water",
        "Take pain relief medication if needed",
        "Check your blood pressure",
        "Consult a doctor if symptoms persist",
    ],
    emergency: false,
};

pub const GENERAL_DIAGNOSIS: Diagnosis = Diagnosis {
    condition: "General Health Concern",
    description: "Based on your symptoms, we recommend monitoring your condition.",
    recommendations: &[
        "Rest and stay hydrated",
        "Monitor your symptoms for 24-48 hours",
        "Consult a doctor if symptoms worsen",
        "Maintain a healthy diet",
        "Get adequate sleep",
    ],
    emergency: false,
};

static SYMPTOM_RULES: Lazy<RuleSet<TagSelection, Diagnosis>> = Lazy::new(|| {
    RuleSet::new(GENERAL_DIAGNOSIS)
        .rule(
            "respiratory",
            has_all(&["fever", "cough"]),
            RESPIRATORY_DIAGNOSIS,
        )
        .rule(
            "digestive",
            has_all(&["stomach-pain", "nausea"]),
            DIGESTIVE_DIAGNOSIS,
        )
        .rule(
            "migraine",
            has_all(&["headache", "dizziness"]),
            MIGRAINE_DIAGNOSIS,
        )
        .priority_rule("emergency", has_any(EMERGENCY_SYMPTOMS), EMERGENCY_DIAGNOSIS)
});

static WORD_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w").expect("valid word start regex"));

pub fn symptom_rules() -> &'static RuleSet<TagSelection, Diagnosis> {
    &SYMPTOM_RULES
}

/// Maps the current selection to a diagnosis. An empty selection yields
/// the general default; callers reject it before getting here.
pub fn diagnose(selection: &TagSelection) -> Diagnosis {
    *SYMPTOM_RULES.evaluate(selection)
}

/// Human label for a symptom tag: `chest-pain` becomes `Chest Pain`.
pub fn display_name(tag: &str) -> String {
    let spaced = tag.replace('-', " ");
    WORD_START_RE
        .replace_all(&spaced, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}
