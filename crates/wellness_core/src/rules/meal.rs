//! Goal-based meal plans with dietary preference rewrites.
//!
//! The goal picks a base plan first; the preference rewrite always runs on
//! that result, never the other way round.

use super::{tag_is, RuleSet};
use once_cell::sync::Lazy;

pub const DEFAULT_GOAL: &str = "healthy-living";

/// Daily plan shown on the meal cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlan {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
    pub calories: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BasePlan {
    breakfast: &'static str,
    lunch: &'static str,
    dinner: &'static str,
    snacks: &'static str,
    calories: &'static str,
}

impl BasePlan {
    fn to_plan(self) -> MealPlan {
        MealPlan {
            breakfast: self.breakfast.to_string(),
            lunch: self.lunch.to_string(),
            dinner: self.dinner.to_string(),
            snacks: self.snacks.to_string(),
            calories: self.calories.to_string(),
        }
    }
}

const WEIGHT_LOSS: BasePlan = BasePlan {
    breakfast: "Oatmeal with fruits and nuts",
    lunch: "Grilled chicken salad with olive oil",
    dinner: "Vegetable soup with whole grain bread",
    snacks: "Greek yogurt, apple slices",
    calories: "1200-1500 kcal/day",
};

const MUSCLE_GAIN: BasePlan = BasePlan {
    breakfast: "Scrambled eggs with whole wheat toast",
    lunch: "Chicken breast with brown rice and vegetables",
    dinner: "Grilled fish with quinoa",
    snacks: "Protein shake, almonds",
    calories: "2500-3000 kcal/day",
};

const HEALTHY_LIVING: BasePlan = BasePlan {
    breakfast: "Smoothie bowl with berries and granola",
    lunch: "Mixed vegetable curry with roti",
    dinner: "Grilled paneer with salad",
    snacks: "Fruits, nuts, green tea",
    calories: "1800-2200 kcal/day",
};

const DIABETES: BasePlan = BasePlan {
    breakfast: "Vegetable upma with low-fat milk",
    lunch: "Dal with brown rice and salad",
    dinner: "Grilled fish with steamed vegetables",
    snacks: "Cucumber, carrot sticks",
    calories: "1500-1800 kcal/day",
};

const HEART_HEALTH: BasePlan = BasePlan {
    breakfast: "Oats with walnuts and berries",
    lunch: "Grilled fish with leafy greens",
    dinner: "Vegetable stir-fry with quinoa",
    snacks: "Almonds, dark chocolate",
    calories: "1800-2000 kcal/day",
};

const ENERGY_BOOST: BasePlan = BasePlan {
    breakfast: "Banana smoothie with peanut butter",
    lunch: "Chicken wrap with vegetables",
    dinner: "Salmon with sweet potato",
    snacks: "Energy bars, dried fruits",
    calories: "2000-2400 kcal/day",
};

/// Rewrite applied to a base plan for a dietary preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceRewrite {
    /// Plan used unchanged.
    Keep,
    /// Named meats swapped in lunch and dinner only.
    Vegetarian,
    /// Lunch, dinner and snacks replaced; animal products swapped in
    /// breakfast.
    Vegan,
}

impl PreferenceRewrite {
    pub fn apply(self, mut plan: MealPlan) -> MealPlan {
        match self {
            Self::Keep => {}
            Self::Vegetarian => {
                plan.lunch = replace_first(&plan.lunch, "chicken", "paneer");
                plan.lunch = replace_first(&plan.lunch, "Chicken", "Paneer");
                plan.dinner = replace_first(&plan.dinner, "fish", "tofu");
                plan.dinner = replace_first(&plan.dinner, "Fish", "Tofu");
            }
            Self::Vegan => {
                plan.breakfast = replace_first(&plan.breakfast, "eggs", "tofu scramble");
                plan.breakfast = replace_first(&plan.breakfast, "milk", "almond milk");
                plan.lunch = "Chickpea curry with brown rice".to_string();
                plan.dinner = "Lentil soup with vegetables".to_string();
                plan.snacks = "Fruits, nuts, seeds".to_string();
            }
        }
        plan
    }
}

static GOAL_RULES: Lazy<RuleSet<str, BasePlan>> = Lazy::new(|| {
    RuleSet::new(HEALTHY_LIVING)
        .rule("weight-loss", tag_is("weight-loss"), WEIGHT_LOSS)
        .rule("muscle-gain", tag_is("muscle-gain"), MUSCLE_GAIN)
        .rule("healthy-living", tag_is("healthy-living"), HEALTHY_LIVING)
        .rule("diabetes", tag_is("diabetes"), DIABETES)
        .rule("heart-health", tag_is("heart-health"), HEART_HEALTH)
        .rule("energy-boost", tag_is("energy-boost"), ENERGY_BOOST)
});

static PREFERENCE_RULES: Lazy<RuleSet<str, PreferenceRewrite>> = Lazy::new(|| {
    RuleSet::new(PreferenceRewrite::Keep)
        .rule(
            "vegetarian",
            tag_is("vegetarian"),
            PreferenceRewrite::Vegetarian,
        )
        .rule("vegan", tag_is("vegan"), PreferenceRewrite::Vegan)
});

/// Goal tags with a dedicated plan, in table order.
pub fn known_goals() -> impl Iterator<Item = &'static str> {
    GOAL_RULES.rules().map(|rule| rule.name())
}

/// Rewrite selected for `preference`.
pub fn preference_rewrite(preference: &str) -> PreferenceRewrite {
    *PREFERENCE_RULES.evaluate(preference)
}

/// Builds the plan for a goal and dietary preference.
///
/// Unknown goals use the healthy-living plan; unknown preferences keep the
/// base plan as is.
pub fn meal_plan(goal: &str, preference: &str) -> MealPlan {
    let base = GOAL_RULES.evaluate(goal).to_plan();
    preference_rewrite(preference).apply(base)
}

fn replace_first(text: &str, from: &str, to: &str) -> String {
    text.replacen(from, to, 1)
}
