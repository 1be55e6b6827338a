// ABOUTME: Core domain types for nutrition prediction and meal recommendation
// ABOUTME: FoodDescriptor, PredictionResult, NutritionProfile, UserProfile, and friends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Domain model for the nutrition intelligence engine.
//!
//! Descriptors, prediction results, and nutrition profiles are ephemeral:
//! computed per call and never cached across requests. `UsageLogEntry` is the
//! only persisted record and is append-only once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Food category used for one-hot encoding, plausibility bounds, and macro ratios
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    /// Meat, poultry, and seafood dishes
    Meats,
    /// Vegetable-based dishes
    Vegetables,
    /// Fruits, fresh or dried
    Fruits,
    /// Rice, bread, noodles, and other grain staples
    Grains,
    /// Milk, cheese, yogurt
    Dairy,
    /// Beans, lentils, tofu, and other legumes
    Legumes,
    /// Chips, pastries, candy, and similar snack foods
    Snacks,
    /// Drinks, juices, shakes
    Beverages,
    /// Category not provided or not recognized
    Unknown,
}

/// Fixed one-hot encoding order for the eight known categories.
///
/// The extractor and any trained model artifact agree on this order; changing
/// it invalidates every persisted model.
pub const CATEGORY_ONE_HOT_ORDER: [FoodCategory; 8] = [
    FoodCategory::Meats,
    FoodCategory::Vegetables,
    FoodCategory::Fruits,
    FoodCategory::Grains,
    FoodCategory::Dairy,
    FoodCategory::Legumes,
    FoodCategory::Snacks,
    FoodCategory::Beverages,
];

impl FoodCategory {
    /// Parse a category from free-form text
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "meats" | "meat" | "poultry" | "seafood" => Self::Meats,
            "vegetables" | "vegetable" | "veggies" => Self::Vegetables,
            "fruits" | "fruit" => Self::Fruits,
            "grains" | "grain" | "rice" | "noodles" => Self::Grains,
            "dairy" => Self::Dairy,
            "legumes" | "legume" | "beans" => Self::Legumes,
            "snacks" | "snack" => Self::Snacks,
            "beverages" | "beverage" | "drinks" => Self::Beverages,
            _ => Self::Unknown,
        }
    }

    /// Position of this category in the one-hot block, `None` for `Unknown`
    #[must_use]
    pub fn one_hot_index(self) -> Option<usize> {
        CATEGORY_ONE_HOT_ORDER.iter().position(|&c| c == self)
    }
}

/// Preparation method tag, detected from food names via keyword tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PreparationMethod {
    /// Deep or shallow fried
    Fried,
    /// Grilled or barbecued
    Grilled,
    /// Boiled in water or broth
    Boiled,
    /// Steamed
    Steamed,
    /// Oven baked
    Baked,
    /// Roasted
    Roasted,
    /// Slow-cooked in liquid (stews, adobo-style dishes)
    Braised,
    /// Pan sauteed or stir-fried
    Sauteed,
    /// Smoked or cured
    Smoked,
    /// Served raw or fresh
    Raw,
}

/// Fixed one-hot encoding order for preparation methods in enhanced feature mode
pub const PREPARATION_ONE_HOT_ORDER: [PreparationMethod; 10] = [
    PreparationMethod::Fried,
    PreparationMethod::Grilled,
    PreparationMethod::Boiled,
    PreparationMethod::Steamed,
    PreparationMethod::Baked,
    PreparationMethod::Roasted,
    PreparationMethod::Braised,
    PreparationMethod::Sauteed,
    PreparationMethod::Smoked,
    PreparationMethod::Raw,
];

impl PreparationMethod {
    /// Position of this method in the preparation one-hot block
    #[must_use]
    pub fn one_hot_index(self) -> usize {
        // Order array covers every variant, so position always exists
        PREPARATION_ONE_HOT_ORDER
            .iter()
            .position(|&p| p == self)
            .unwrap_or(0)
    }
}

/// Structured input describing one food item to evaluate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDescriptor {
    /// Food name as entered by the user
    pub name: String,
    /// Food category, `Unknown` when not provided
    #[serde(default = "default_category")]
    pub category: FoodCategory,
    /// Serving size in grams, must be positive
    pub serving_size_grams: f64,
    /// Preparation method when explicitly known (otherwise detected from the name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation: Option<PreparationMethod>,
    /// Ingredient list when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

const fn default_category() -> FoodCategory {
    FoodCategory::Unknown
}

impl FoodDescriptor {
    /// Create a descriptor with just a name, category, and serving size
    #[must_use]
    pub fn new(name: impl Into<String>, category: FoodCategory, serving_size_grams: f64) -> Self {
        Self {
            name: name.into(),
            category,
            serving_size_grams,
            preparation: None,
            ingredients: None,
        }
    }
}

/// Which path of the prediction hierarchy produced a result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Exact dataset hit
    DatabaseLookup,
    /// Regression model output accepted as-is
    MlModel,
    /// Weighted blend of model output and rule-based estimate
    Blended,
    /// Rule-based heuristic only
    RuleBased,
}

impl PredictionMethod {
    /// Stable snake_case label, matching the persisted log format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DatabaseLookup => "database_lookup",
            Self::MlModel => "ml_model",
            Self::Blended => "blended",
            Self::RuleBased => "rule_based",
        }
    }
}

/// Calorie prediction for one food descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    /// Predicted calorie density (kcal per 100 g)
    pub calories_per_100g: f64,
    /// Calories for the requested serving: density x serving/100
    pub total_calories: f64,
    /// Which path of the prediction hierarchy produced this result
    pub method: PredictionMethod,
    /// Trust in this prediction, 0..1
    pub confidence: f64,
    /// Category the prediction was made under
    pub category: FoodCategory,
}

/// Full macronutrient profile for one serving, derived from predicted calories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionProfile {
    /// Calories for the serving
    pub calories: f64,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
    /// Fiber in grams
    pub fiber_g: f64,
}

/// Prediction result paired with its projected macro profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPrediction {
    /// Calorie prediction and provenance
    pub prediction: PredictionResult,
    /// Projected macros for the serving
    pub nutrition: NutritionProfile,
}

/// Biological sex, used for energy-needs formulas and nutrient emphasis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male (higher basal metabolic rate)
    Male,
    /// Female (lower basal metabolic rate, iron emphasis)
    Female,
}

/// Self-reported activity level for daily energy expenditure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    LightlyActive,
    /// Exercise 3-5 days/week
    ModeratelyActive,
    /// Exercise 6-7 days/week
    VeryActive,
    /// Hard training twice a day
    ExtraActive,
}

/// User's nutrition goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Caloric deficit
    LoseWeight,
    /// Caloric balance
    MaintainWeight,
    /// Caloric surplus with protein emphasis
    GainMuscle,
}

/// Read-only user profile consumed from the account layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Biological sex
    pub sex: Sex,
    /// Age in years
    pub age: u32,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Self-reported activity level
    pub activity_level: ActivityLevel,
    /// Nutrition goal
    pub goal: Goal,
    /// Saved dietary preference tags from onboarding
    #[serde(default)]
    pub dietary_preferences: Vec<PreferenceTag>,
}

/// Dietary preference tag selectable in-session or saved at onboarding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceTag {
    /// Hard exclusion: no meat, seafood, or egg
    PlantBased,
    /// Hard exclusion: no calorie-dense, fried, or nutritionally poor foods
    Healthy,
    /// Soft: hearty, familiar dishes
    Comfort,
    /// Soft: spicy dishes
    Spicy,
    /// Soft: sweet dishes and desserts
    Sweet,
    /// Soft: high-protein foods
    Protein,
}

impl PreferenceTag {
    /// Whether this tag removes candidates outright rather than adjusting score
    #[must_use]
    pub const fn is_hard_exclusion(self) -> bool {
        matches!(self, Self::PlantBased | Self::Healthy)
    }

    /// Parse a tag from free-form text, `None` for unrecognized tags
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "plant_based" | "plant-based" | "plantbased" | "vegetarian" => Some(Self::PlantBased),
            "healthy" => Some(Self::Healthy),
            "comfort" => Some(Self::Comfort),
            "spicy" => Some(Self::Spicy),
            "sweet" => Some(Self::Sweet),
            "protein" | "high_protein" => Some(Self::Protein),
            _ => None,
        }
    }
}

/// Type of meal being recommended for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    Snack,
}

impl MealType {
    /// Parse meal type from string, defaulting to snack
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            _ => Self::Snack,
        }
    }
}

/// One ranked recommendation candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Food name
    pub name: String,
    /// Projected nutrition for the serving
    pub nutrition: NutritionProfile,
    /// Composite recommendation score (higher is better)
    pub score: f64,
    /// Preference tags this candidate matched during filtering
    pub matched_tags: Vec<PreferenceTag>,
    /// Confidence of the underlying calorie prediction
    pub confidence: f64,
}

/// Append-only usage record emitted for every prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLogEntry {
    /// Unique entry id
    pub id: Uuid,
    /// When the prediction was made
    pub timestamp: DateTime<Utc>,
    /// Food name the prediction was requested for
    pub food_name: String,
    /// Prediction path taken
    pub method: PredictionMethod,
    /// Total calories predicted for the serving
    pub calories: f64,
    /// Prediction confidence, 0..1
    pub confidence: f64,
    /// Category the prediction was made under
    pub category: FoodCategory,
}

impl UsageLogEntry {
    /// Build a log entry from a prediction result
    #[must_use]
    pub fn from_prediction(food_name: &str, result: &PredictionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            food_name: food_name.to_owned(),
            method: result.method,
            calories: result.total_calories,
            confidence: result.confidence,
            category: result.category,
        }
    }
}
