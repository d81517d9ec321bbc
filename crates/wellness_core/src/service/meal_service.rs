//! Meal planner selections.
//!
//! Goal and preference are independent single-choice slots; selecting a
//! value replaces the previous one.

use crate::model::input::InputError;
use crate::rules::meal::{meal_plan, MealPlan};
use log::info;

#[derive(Debug, Default)]
pub struct MealPlanner {
    goal: Option<String>,
    preference: Option<String>,
}

impl MealPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a goal tag; a blank tag clears the slot.
    pub fn select_goal(&mut self, goal: &str) {
        self.goal = non_blank(goal);
    }

    /// Selects a dietary preference tag; a blank tag clears the slot.
    pub fn select_preference(&mut self, preference: &str) {
        self.preference = non_blank(preference);
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn preference(&self) -> Option<&str> {
        self.preference.as_deref()
    }

    pub fn clear(&mut self) {
        self.goal = None;
        self.preference = None;
    }

    /// Builds the plan for the selected goal and preference.
    ///
    /// # Errors
    /// - `IncompleteMealSelection` unless both slots are filled.
    pub fn generate(&self) -> Result<MealPlan, InputError> {
        let (Some(goal), Some(preference)) = (self.goal(), self.preference()) else {
            return Err(InputError::IncompleteMealSelection);
        };

        let plan = meal_plan(goal, preference);
        info!(
            "event=meal_generate module=meal status=ok goal={} preference={}",
            goal, preference
        );
        Ok(plan)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::MealPlanner;
    use crate::model::input::InputError;

    #[test]
    fn generate_requires_both_slots() {
        let mut planner = MealPlanner::new();
        assert_eq!(planner.generate(), Err(InputError::IncompleteMealSelection));

        planner.select_goal("diabetes");
        assert_eq!(planner.generate(), Err(InputError::IncompleteMealSelection));

        planner.select_preference("vegetarian");
        let plan = planner.generate().unwrap();
        assert_eq!(plan.dinner, "Grilled tofu with steamed vegetables");
    }

    #[test]
    fn later_selection_replaces_earlier_one() {
        let mut planner = MealPlanner::new();
        planner.select_goal("weight-loss");
        planner.select_goal("energy-boost");
        planner.select_preference("vegan");
        planner.select_preference("non-vegetarian");

        assert_eq!(planner.goal(), Some("energy-boost"));
        let plan = planner.generate().unwrap();
        assert_eq!(plan.lunch, "Chicken wrap with vegetables");
    }

    #[test]
    fn blank_selection_clears_slot() {
        let mut planner = MealPlanner::new();
        planner.select_goal("diabetes");
        planner.select_goal("  ");
        assert_eq!(planner.goal(), None);
    }
}
