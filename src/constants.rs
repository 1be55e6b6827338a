// ABOUTME: Nutrition constants: calorie densities, plausibility bounds, macro ratios
// ABOUTME: Namespaced numeric tables used by the predictor, projector, and scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Nutrition constants grounded in food-composition references.
//!
//! Values are drawn from USDA FoodData Central survey (FNDDS) category
//! averages and standard sports-nutrition formulas. Calorie densities are
//! category-level approximations used only when neither the dataset nor the
//! trained model can answer; they are intentionally coarse.

/// Baseline calorie density per food category (kcal per 100 g)
///
/// References:
/// - USDA FoodData Central, <https://fdc.nal.usda.gov/>
/// - FNDDS 2019-2020 category means
pub mod category_density {
    /// Cooked meat, poultry, and seafood dishes
    pub const MEATS: f64 = 220.0;
    /// Cooked vegetable dishes
    pub const VEGETABLES: f64 = 55.0;
    /// Fresh fruit
    pub const FRUITS: f64 = 60.0;
    /// Cooked rice, noodles, bread
    pub const GRAINS: f64 = 160.0;
    /// Milk, cheese, yogurt averaged across fat levels
    pub const DAIRY: f64 = 120.0;
    /// Cooked beans, lentils, tofu
    pub const LEGUMES: f64 = 140.0;
    /// Chips, pastries, candy
    pub const SNACKS: f64 = 450.0;
    /// Juices, sodas, shakes
    pub const BEVERAGES: f64 = 45.0;
    /// Fallback when category is unknown
    pub const UNKNOWN: f64 = 150.0;
}

/// Category-specific plausibility bounds for model output (kcal per 100 g).
///
/// A fixed global rejection threshold used to discard legitimate high-calorie
/// foods (nuts, fried snacks); these per-category caps replaced it. Model
/// output above the cap is blended or discarded rather than accepted as-is.
pub mod plausibility {
    /// Upper bound for meat dishes (fatty cuts, crackling)
    pub const MEATS_MAX: f64 = 600.0;
    /// Upper bound for vegetable dishes
    pub const VEGETABLES_MAX: f64 = 150.0;
    /// Upper bound for fruits (dried fruit tops out near here)
    pub const FRUITS_MAX: f64 = 350.0;
    /// Upper bound for grain staples
    pub const GRAINS_MAX: f64 = 400.0;
    /// Upper bound for dairy (hard cheese)
    pub const DAIRY_MAX: f64 = 450.0;
    /// Upper bound for legumes (fried beans, peanut-based)
    pub const LEGUMES_MAX: f64 = 400.0;
    /// Upper bound for snack foods
    pub const SNACKS_MAX: f64 = 550.0;
    /// Upper bound for beverages (cream-heavy shakes)
    pub const BEVERAGES_MAX: f64 = 250.0;
    /// Upper bound when category is unknown (pure fat is ~900)
    pub const UNKNOWN_MAX: f64 = 700.0;

    /// Model output at or beyond this is an extreme outlier and is discarded
    /// outright in favor of the rule-based estimate
    pub const EXTREME_OUTLIER_KCAL: f64 = 5000.0;

    /// Relative disagreement with the rule-based estimate below which model
    /// output is accepted without blending
    pub const AGREEMENT_TOLERANCE: f64 = 0.35;

    /// Bound overshoot factor still eligible for blending (cap x factor)
    pub const RELAXED_BOUND_FACTOR: f64 = 1.5;
}

/// Calorie multipliers per preparation method, applied to category baselines.
///
/// Frying adds absorbed oil; grilling and steaming render or add nothing.
/// Reference: USDA retention/yield factors for cooking methods.
pub mod preparation {
    /// Deep/shallow frying adds roughly 30% through oil absorption
    pub const FRIED_MULTIPLIER: f64 = 1.30;
    /// Grilling renders fat off the food
    pub const GRILLED_MULTIPLIER: f64 = 0.90;
    /// Boiling leaches some soluble solids
    pub const BOILED_MULTIPLIER: f64 = 0.95;
    /// Steaming adds nothing
    pub const STEAMED_MULTIPLIER: f64 = 0.90;
    /// Baking with light fat
    pub const BAKED_MULTIPLIER: f64 = 1.05;
    /// Roasting with light fat
    pub const ROASTED_MULTIPLIER: f64 = 1.05;
    /// Braising concentrates the cooking liquid
    pub const BRAISED_MULTIPLIER: f64 = 1.10;
    /// Sauteing/stir-frying in oil
    pub const SAUTEED_MULTIPLIER: f64 = 1.15;
    /// Smoking/curing
    pub const SMOKED_MULTIPLIER: f64 = 1.05;
    /// Raw preparations
    pub const RAW_MULTIPLIER: f64 = 1.0;

    /// Extra fat grams per 100 g attributed to frying oil absorption
    /// Reference: oil uptake in deep-fried foods is typically 8-25% by weight
    pub const FRYING_OIL_FAT_G_PER_100G: f64 = 8.0;
}

/// Macronutrient calorie fractions per category: (protein, carbs, fat).
///
/// Fractions sum to 1.0 per row. These drive the deterministic macro
/// projection; they are documented approximations, not learned values.
pub mod macro_ratios {
    /// Meat dishes: protein-dominant
    pub const MEATS: (f64, f64, f64) = (0.40, 0.10, 0.50);
    /// Vegetables: carb-dominant, very low fat
    pub const VEGETABLES: (f64, f64, f64) = (0.20, 0.65, 0.15);
    /// Fruits: almost all carbohydrate
    pub const FRUITS: (f64, f64, f64) = (0.05, 0.90, 0.05);
    /// Grain staples: carb-dominant
    pub const GRAINS: (f64, f64, f64) = (0.12, 0.73, 0.15);
    /// Dairy: balanced protein/fat
    pub const DAIRY: (f64, f64, f64) = (0.25, 0.35, 0.40);
    /// Legumes: protein and carbs
    pub const LEGUMES: (f64, f64, f64) = (0.28, 0.52, 0.20);
    /// Snack foods: carbs and fat
    pub const SNACKS: (f64, f64, f64) = (0.07, 0.53, 0.40);
    /// Beverages: sugar-dominant
    pub const BEVERAGES: (f64, f64, f64) = (0.05, 0.85, 0.10);
    /// Unknown/mixed: middling split
    pub const UNKNOWN: (f64, f64, f64) = (0.15, 0.50, 0.35);
}

/// Fiber content per category (grams per 100 g)
pub mod fiber {
    /// Meat dishes carry no fiber
    pub const MEATS: f64 = 0.0;
    /// Vegetables
    pub const VEGETABLES: f64 = 2.8;
    /// Fruits
    pub const FRUITS: f64 = 2.2;
    /// Whole and refined grains averaged
    pub const GRAINS: f64 = 1.8;
    /// Dairy carries no fiber
    pub const DAIRY: f64 = 0.0;
    /// Legumes are the richest everyday fiber source
    pub const LEGUMES: f64 = 5.5;
    /// Snack foods
    pub const SNACKS: f64 = 1.2;
    /// Beverages
    pub const BEVERAGES: f64 = 0.1;
    /// Unknown
    pub const UNKNOWN: f64 = 1.5;
}

/// Energy-needs formulas for daily calorie targets.
///
/// References:
/// - Mifflin, M.D., et al. (1990). A new predictive equation for resting
///   energy expenditure. *Am J Clin Nutr*, 51(2), 241-247.
/// - McArdle et al. (2010), Exercise Physiology (activity factors)
pub mod energy {
    /// Mifflin-St Jeor weight coefficient
    pub const MSJ_WEIGHT_COEF: f64 = 10.0;
    /// Mifflin-St Jeor height coefficient
    pub const MSJ_HEIGHT_COEF: f64 = 6.25;
    /// Mifflin-St Jeor age coefficient
    pub const MSJ_AGE_COEF: f64 = -5.0;
    /// Mifflin-St Jeor male constant
    pub const MSJ_MALE_CONSTANT: f64 = 5.0;
    /// Mifflin-St Jeor female constant
    pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;
    /// Safety floor for computed BMR (kcal/day)
    pub const MIN_BMR: f64 = 1000.0;

    /// Activity factor: sedentary
    pub const FACTOR_SEDENTARY: f64 = 1.2;
    /// Activity factor: lightly active
    pub const FACTOR_LIGHTLY_ACTIVE: f64 = 1.375;
    /// Activity factor: moderately active
    pub const FACTOR_MODERATELY_ACTIVE: f64 = 1.55;
    /// Activity factor: very active
    pub const FACTOR_VERY_ACTIVE: f64 = 1.725;
    /// Activity factor: hard training twice a day
    pub const FACTOR_EXTRA_ACTIVE: f64 = 1.9;

    /// Daily adjustment for weight loss (kcal)
    pub const LOSE_WEIGHT_ADJUSTMENT: f64 = -500.0;
    /// Daily adjustment for muscle gain (kcal)
    pub const GAIN_MUSCLE_ADJUSTMENT: f64 = 300.0;
    /// Safety floor for adjusted daily target (kcal)
    pub const MIN_DAILY_TARGET: f64 = 1200.0;
}

/// Meal-slot fractions of the daily calorie target
pub mod meal_split {
    /// Breakfast share
    pub const BREAKFAST: f64 = 0.25;
    /// Lunch share
    pub const LUNCH: f64 = 0.35;
    /// Dinner share
    pub const DINNER: f64 = 0.30;
    /// Snack share
    pub const SNACK: f64 = 0.10;
}
