// ABOUTME: Tunable engine configuration: predictor thresholds, filter thresholds, scorer weights
// ABOUTME: Nested config structs with product-decided values as defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Engine configuration.
//!
//! Numeric thresholds here are embedded product decisions (the `healthy`
//! filter's 400 kcal and 25 g fat caps in particular); defaults carry the
//! agreed values and should not change without product guidance.

use serde::{Deserialize, Serialize};

/// Aggregate configuration for the nutrition engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Calorie predictor validation and blending parameters
    pub predictor: PredictorConfig,
    /// Hard-exclusion thresholds for the `healthy` preference tag
    pub healthy: HealthyThresholds,
    /// Active vs saved preference weighting
    pub preferences: PreferenceWeights,
    /// Composite recommendation score weights
    pub scorer: ScorerWeights,
    /// Recommendation output limits
    pub limits: ScorerLimits,
}

/// Confidence and blending parameters for the calorie predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Confidence assigned to exact dataset hits
    pub dataset_confidence: f64,
    /// Confidence assigned when model output is accepted as-is
    pub model_confidence: f64,
    /// Confidence assigned to pure rule-based fallbacks
    pub rule_based_confidence: f64,
    /// Lower end of the blended-confidence range
    pub blend_confidence_min: f64,
    /// Upper end of the blended-confidence range
    pub blend_confidence_max: f64,
    /// Model weight in a blend when output is within relaxed bounds
    pub blend_model_weight_in_bounds: f64,
    /// Model weight in a blend when output exceeds relaxed bounds
    pub blend_model_weight_out_of_bounds: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            dataset_confidence: 0.95,
            model_confidence: 0.85,
            rule_based_confidence: 0.70,
            blend_confidence_min: 0.60,
            blend_confidence_max: 0.75,
            blend_model_weight_in_bounds: 0.65,
            blend_model_weight_out_of_bounds: 0.40,
        }
    }
}

/// Hard-exclusion thresholds behind the `healthy` preference tag.
///
/// A food is excluded when ANY clause fires: calories over the per-serving
/// cap, fried/processed-meat keyword match, fat over the per-serving cap, or
/// the dense-poor clause (calorie-dense with little fiber and protein).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthyThresholds {
    /// Per-serving calorie cap
    pub max_calories_per_serving: f64,
    /// Per-serving fat cap (grams)
    pub max_fat_g_per_serving: f64,
    /// Dense-poor clause: calorie floor
    pub dense_poor_calorie_floor: f64,
    /// Dense-poor clause: fiber ceiling (grams)
    pub dense_poor_fiber_ceiling: f64,
    /// Dense-poor clause: protein ceiling (grams)
    pub dense_poor_protein_ceiling: f64,
}

impl Default for HealthyThresholds {
    fn default() -> Self {
        Self {
            max_calories_per_serving: 400.0,
            max_fat_g_per_serving: 25.0,
            dense_poor_calorie_floor: 350.0,
            dense_poor_fiber_ceiling: 2.0,
            dense_poor_protein_ceiling: 15.0,
        }
    }
}

/// Weighting between session-scoped filters and saved onboarding preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceWeights {
    /// Weight of tags the user selected this session
    pub active_filter_weight: f64,
    /// Weight of saved tags not re-selected this session
    pub saved_preference_weight: f64,
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self {
            active_filter_weight: 0.70,
            saved_preference_weight: 0.30,
        }
    }
}

/// Weights for the composite recommendation score.
///
/// The five weights sum to 1.0; each sub-score is normalized to 0..1 before
/// weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerWeights {
    /// Distance from the per-meal calorie target
    pub calorie_fit: f64,
    /// Alignment with the user's goal
    pub goal_alignment: f64,
    /// Preference tag matches
    pub preference_match: f64,
    /// Association with the requested meal slot
    pub meal_type_fit: f64,
    /// Activity level and sex-specific nutrient emphasis
    pub activity_adjustment: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            calorie_fit: 0.30,
            goal_alignment: 0.30,
            preference_match: 0.20,
            meal_type_fit: 0.10,
            activity_adjustment: 0.10,
        }
    }
}

/// Limits on recommendation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerLimits {
    /// Default number of candidates returned when the caller does not cap
    pub default_top_n: usize,
}

impl Default for ScorerLimits {
    fn default() -> Self {
        Self { default_top_n: 10 }
    }
}
