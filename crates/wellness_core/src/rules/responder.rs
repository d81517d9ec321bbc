//! Keyword responder for the support chat.
//!
//! Matching lowercases the whole message and looks for keyword substrings,
//! so "down" also fires inside "downtown". That is accepted behavior.

use super::{contains_any, RuleSet};
use once_cell::sync::Lazy;

pub const ANXIETY_RESPONSE: &str = "I hear that you're feeling anxious. Remember to take deep breaths - inhale for 4 counts, hold for 4, exhale for 4. You're not alone in this feeling, and it will pass.";
pub const SADNESS_RESPONSE: &str = "I'm sorry you're feeling down. It's okay to not be okay sometimes. Consider reaching out to someone you trust, or try doing something small that usually brings you joy.";
pub const STRESS_RESPONSE: &str = "Feeling stressed is completely normal. Try breaking tasks into smaller steps, and remember to take breaks. You don't have to do everything at once.";
pub const SLEEP_RESPONSE: &str = "Sleep is so important for mental health. Try establishing a bedtime routine, avoiding screens before bed, and keeping your bedroom cool and dark. If sleep issues persist, consider talking to a healthcare provider.";
pub const GRATITUDE_RESPONSE: &str = "You're very welcome! I'm here whenever you need support. Remember, taking care of your mental health is a sign of strength.";
pub const HELP_RESPONSE: &str = "I'm here to support you. You can talk to me about how you're feeling, track your mood, or explore our wellness tips. If you're in crisis, please reach out to a mental health professional or crisis helpline.";
pub const POSITIVE_RESPONSE: &str = "That's wonderful to hear! It's important to celebrate the good moments. What's contributing to your positive mood today?";
pub const LONELINESS_RESPONSE: &str = "Feeling lonely can be really difficult. Remember that reaching out is a brave step. Consider connecting with friends, family, or support groups. You matter, and your feelings are valid.";
pub const FALLBACK_RESPONSE: &str = "Thank you for sharing that with me. I'm here to listen and support you. How are you feeling right now? Remember, it's okay to take things one step at a time.";

static RESPONDER_RULES: Lazy<RuleSet<str, &'static str>> = Lazy::new(|| {
    RuleSet::new(FALLBACK_RESPONSE)
        .rule(
            "anxiety",
            contains_any(&["anxious", "anxiety", "worried"]),
            ANXIETY_RESPONSE,
        )
        .rule(
            "sadness",
            contains_any(&["sad", "depressed", "down"]),
            SADNESS_RESPONSE,
        )
        .rule(
            "stress",
            contains_any(&["stress", "overwhelmed"]),
            STRESS_RESPONSE,
        )
        .rule(
            "sleep",
            contains_any(&["sleep", "tired", "insomnia"]),
            SLEEP_RESPONSE,
        )
        .rule(
            "gratitude",
            contains_any(&["thank", "thanks"]),
            GRATITUDE_RESPONSE,
        )
        .rule("help", contains_any(&["help", "support"]), HELP_RESPONSE)
        .rule(
            "positive",
            contains_any(&["happy", "great", "good"]),
            POSITIVE_RESPONSE,
        )
        .rule(
            "loneliness",
            contains_any(&["lonely", "alone", "isolated"]),
            LONELINESS_RESPONSE,
        )
});

/// The responder's rule table, in evaluation order.
pub fn responder_rules() -> &'static RuleSet<str, &'static str> {
    &RESPONDER_RULES
}

/// Picks the reply for a user message.
pub fn respond(message: &str) -> &'static str {
    let normalized = message.to_lowercase();
    RESPONDER_RULES.evaluate(normalized.as_str())
}
