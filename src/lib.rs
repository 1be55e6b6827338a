// ABOUTME: Main library entry point for the Kusina nutrition intelligence engine
// ABOUTME: Exposes calorie prediction, macro projection, and meal recommendation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

#![deny(unsafe_code)]

//! # Kusina Intelligence
//!
//! A nutrition prediction and recommendation engine for Filipino and mixed
//! cuisines. Given a textual food description, the engine predicts calories
//! through a hierarchical strategy chain (curated dataset lookup, then model
//! inference with rule-based validation, then a pure rule-based fallback),
//! projects the calories into a full macronutrient profile, and ranks
//! candidate meals for a user's goals and dietary preferences.
//!
//! ## Architecture
//!
//! - **Models**: Shared domain types (foods, predictions, user profiles)
//! - **Dataset**: Curated per-100g nutrition lookup with name normalization
//! - **Features**: Text-derived feature vectors for model inference
//! - **Predictor**: The hierarchical prediction chain
//! - **Projector**: Category-aware calorie-to-macro projection
//! - **Preferences**: Hard and soft dietary preference filtering
//! - **Scorer**: Composite recommendation scoring and ranking
//! - **Monitor**: Usage counters with optional JSONL persistence
//! - **Engine**: The facade wiring everything together
//!
//! ## Example Usage
//!
//! ```rust
//! use kusina_intelligence::engine::NutritionEngine;
//! use kusina_intelligence::models::{FoodCategory, FoodDescriptor};
//!
//! let engine = NutritionEngine::builtin();
//! let meal = engine.predict_nutrition(&FoodDescriptor::new(
//!     "chicken adobo",
//!     FoodCategory::Meats,
//!     250.0,
//! ));
//! assert!(meal.prediction.total_calories > 0.0);
//! assert!(meal.nutrition.protein_g > 0.0);
//! ```

pub mod config;
pub mod constants;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod features;
pub mod logging;
pub mod model;
pub mod models;
pub mod monitor;
pub mod predictor;
pub mod preferences;
pub mod projector;
pub mod scorer;

pub use engine::NutritionEngine;
pub use errors::{AppError, AppResult, ErrorCode};
pub use models::{
    FoodCategory, FoodDescriptor, MealPrediction, MealType, NutritionProfile, PredictionMethod,
    PredictionResult, PreferenceTag, ScoredCandidate, UserProfile,
};
