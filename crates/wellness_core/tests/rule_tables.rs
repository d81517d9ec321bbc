use wellness_core::rules::meal::{known_goals, DEFAULT_GOAL};
use wellness_core::rules::responder::{
    responder_rules, ANXIETY_RESPONSE, FALLBACK_RESPONSE, LONELINESS_RESPONSE, SADNESS_RESPONSE,
};
use wellness_core::rules::symptom::{
    symptom_rules, EMERGENCY_DIAGNOSIS, GENERAL_DIAGNOSIS, RESPIRATORY_DIAGNOSIS,
};
use wellness_core::{diagnose, meal_plan, respond, TagSelection};

const SYMPTOM_TAGS: &[&str] = &[
    "fever",
    "cough",
    "headache",
    "dizziness",
    "stomach-pain",
    "nausea",
    "fatigue",
    "breathing",
];

#[test]
fn anxious_in_any_case_gets_anxiety_response() {
    for message in ["anxious", "I'm so ANXIOUS today", "feeling AnXiOuS and sad"] {
        assert_eq!(respond(message), ANXIETY_RESPONSE, "{message}");
    }
}

#[test]
fn earlier_keyword_group_wins() {
    // "down" (sadness) is declared before "alone" (loneliness).
    assert_eq!(respond("alone and down"), SADNESS_RESPONSE);
    assert_eq!(respond("so isolated"), LONELINESS_RESPONSE);
    assert_eq!(respond("what's for lunch?"), FALLBACK_RESPONSE);
    assert_eq!(responder_rules().len(), 8);
}

#[test]
fn chest_pain_with_anything_is_an_emergency() {
    // Every subset of the other tags, with chest pain added.
    for mask in 0u32..(1 << SYMPTOM_TAGS.len()) {
        let mut selection = SYMPTOM_TAGS
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, tag)| *tag)
            .collect::<TagSelection>();
        selection.toggle("chest-pain");
        assert_eq!(diagnose(&selection), EMERGENCY_DIAGNOSIS, "mask {mask:b}");
    }
}

#[test]
fn symptom_combinations_follow_table_order() {
    let respiratory = ["cough", "fever"].into_iter().collect::<TagSelection>();
    assert_eq!(diagnose(&respiratory), RESPIRATORY_DIAGNOSIS);

    let unmatched = ["fatigue"].into_iter().collect::<TagSelection>();
    assert_eq!(diagnose(&unmatched), GENERAL_DIAGNOSIS);

    let evaluated = symptom_rules().evaluate_match(&respiratory);
    assert_eq!(evaluated.rule, Some("respiratory"));
}

#[test]
fn unknown_goal_uses_default_plan() {
    assert_eq!(
        meal_plan("marathon-prep", "non-vegetarian"),
        meal_plan(DEFAULT_GOAL, "non-vegetarian")
    );
    assert_eq!(known_goals().count(), 6);
    for goal in known_goals() {
        let plan = meal_plan(goal, "vegan");
        assert_eq!(plan.lunch, "Chickpea curry with brown rice", "{goal}");
    }
}
