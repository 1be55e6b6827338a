// ABOUTME: Hierarchical calorie predictor: dataset lookup, model inference, rule-based fallback
// ABOUTME: Category-aware validation and blending of model output; emits one usage entry per call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Calorie predictor.
//!
//! Strategies are tried in a fixed order: exact dataset lookup (terminal on
//! hit), model inference with category-aware validation, rule-based
//! heuristic. Each strategy is independently testable behind
//! [`PredictionStrategy`]. The predictor always answers: if the model never
//! loaded, the chain is just dataset + rules and the rest of the application
//! keeps working.

use crate::config::PredictorConfig;
use crate::constants::{category_density, plausibility, preparation as prep_constants};
use crate::dataset::FoodDataset;
use crate::features::{FeatureExtractor, FeatureMode};
use crate::model::CalorieModel;
use crate::models::{
    FoodCategory, FoodDescriptor, PredictionMethod, PredictionResult, PreparationMethod,
    UsageLogEntry,
};
use crate::monitor::UsageMonitor;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serving size assumed when the descriptor carries a non-positive one.
/// Malformed input degrades instead of failing the request.
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// Baseline calorie density for a category (kcal per 100 g)
#[must_use]
pub fn base_density(category: FoodCategory) -> f64 {
    match category {
        FoodCategory::Meats => category_density::MEATS,
        FoodCategory::Vegetables => category_density::VEGETABLES,
        FoodCategory::Fruits => category_density::FRUITS,
        FoodCategory::Grains => category_density::GRAINS,
        FoodCategory::Dairy => category_density::DAIRY,
        FoodCategory::Legumes => category_density::LEGUMES,
        FoodCategory::Snacks => category_density::SNACKS,
        FoodCategory::Beverages => category_density::BEVERAGES,
        FoodCategory::Unknown => category_density::UNKNOWN,
    }
}

/// Plausibility cap for model output in a category (kcal per 100 g)
#[must_use]
pub fn plausibility_cap(category: FoodCategory) -> f64 {
    match category {
        FoodCategory::Meats => plausibility::MEATS_MAX,
        FoodCategory::Vegetables => plausibility::VEGETABLES_MAX,
        FoodCategory::Fruits => plausibility::FRUITS_MAX,
        FoodCategory::Grains => plausibility::GRAINS_MAX,
        FoodCategory::Dairy => plausibility::DAIRY_MAX,
        FoodCategory::Legumes => plausibility::LEGUMES_MAX,
        FoodCategory::Snacks => plausibility::SNACKS_MAX,
        FoodCategory::Beverages => plausibility::BEVERAGES_MAX,
        FoodCategory::Unknown => plausibility::UNKNOWN_MAX,
    }
}

/// Calorie multiplier for a preparation method
#[must_use]
pub fn preparation_multiplier(preparation: Option<PreparationMethod>) -> f64 {
    match preparation {
        Some(PreparationMethod::Fried) => prep_constants::FRIED_MULTIPLIER,
        Some(PreparationMethod::Grilled) => prep_constants::GRILLED_MULTIPLIER,
        Some(PreparationMethod::Boiled) => prep_constants::BOILED_MULTIPLIER,
        Some(PreparationMethod::Steamed) => prep_constants::STEAMED_MULTIPLIER,
        Some(PreparationMethod::Baked) => prep_constants::BAKED_MULTIPLIER,
        Some(PreparationMethod::Roasted) => prep_constants::ROASTED_MULTIPLIER,
        Some(PreparationMethod::Braised) => prep_constants::BRAISED_MULTIPLIER,
        Some(PreparationMethod::Sauteed) => prep_constants::SAUTEED_MULTIPLIER,
        Some(PreparationMethod::Smoked) => prep_constants::SMOKED_MULTIPLIER,
        Some(PreparationMethod::Raw) | None => prep_constants::RAW_MULTIPLIER,
    }
}

/// Effective serving size, defaulting malformed values
fn effective_serving(descriptor: &FoodDescriptor) -> f64 {
    if descriptor.serving_size_grams > 0.0 {
        descriptor.serving_size_grams
    } else {
        DEFAULT_SERVING_GRAMS
    }
}

fn build_result(
    density: f64,
    serving: f64,
    method: PredictionMethod,
    confidence: f64,
    category: FoodCategory,
) -> PredictionResult {
    PredictionResult {
        calories_per_100g: density,
        total_calories: density * serving / 100.0,
        method,
        confidence,
        category,
    }
}

/// One rung of the prediction hierarchy
pub trait PredictionStrategy: Send + Sync {
    /// Strategy name for diagnostics
    fn name(&self) -> &'static str;

    /// Try to predict; `None` defers to the next strategy in the chain
    fn predict(&self, descriptor: &FoodDescriptor) -> Option<PredictionResult>;
}

/// Exact-match lookup against the known-food dataset
pub struct DatasetLookupStrategy {
    dataset: Arc<FoodDataset>,
    confidence: f64,
}

impl DatasetLookupStrategy {
    /// Create the lookup strategy
    #[must_use]
    pub fn new(dataset: Arc<FoodDataset>, confidence: f64) -> Self {
        Self {
            dataset,
            confidence,
        }
    }
}

impl PredictionStrategy for DatasetLookupStrategy {
    fn name(&self) -> &'static str {
        "dataset_lookup"
    }

    fn predict(&self, descriptor: &FoodDescriptor) -> Option<PredictionResult> {
        let entry = self.dataset.lookup(&descriptor.name)?;
        // dataset category outranks whatever the caller guessed
        Some(build_result(
            entry.calories_per_100g,
            effective_serving(descriptor),
            PredictionMethod::DatabaseLookup,
            self.confidence,
            entry.category,
        ))
    }
}

/// Model inference with category-aware validation and blending.
///
/// The raw model estimate is checked against category plausibility bounds
/// and the independent rule-based estimate:
/// - in bounds and close to the rules: accepted as-is (`ml_model`)
/// - moderate disagreement or a mild bound overshoot: weighted blend
/// - at or past the extreme-outlier threshold: discarded for the rules
pub struct ModelInferenceStrategy {
    model: Arc<dyn CalorieModel>,
    extractor: FeatureExtractor,
    mode: FeatureMode,
    config: PredictorConfig,
}

impl ModelInferenceStrategy {
    /// Create the model strategy; mode comes from the model's input width.
    ///
    /// Returns `None` when the model reports a width no extractor layout
    /// matches, in which case the chain runs without it.
    #[must_use]
    pub fn new(model: Arc<dyn CalorieModel>, config: PredictorConfig) -> Option<Self> {
        let width = model.input_width();
        let Some(mode) = FeatureMode::from_width(width) else {
            warn!(width, "model input width matches no feature layout; model disabled");
            return None;
        };
        Some(Self {
            model,
            extractor: FeatureExtractor::new(),
            mode,
            config,
        })
    }

    fn validate_and_blend(
        &self,
        ml_density: f64,
        rule_density: f64,
        category: FoodCategory,
    ) -> (f64, PredictionMethod, f64) {
        if ml_density >= plausibility::EXTREME_OUTLIER_KCAL {
            // genuine model failure; the rules are more trustworthy
            return (
                rule_density,
                PredictionMethod::RuleBased,
                self.config.rule_based_confidence,
            );
        }

        let cap = plausibility_cap(category);
        let relative_diff = (ml_density - rule_density).abs() / rule_density.max(1.0);

        if ml_density <= cap && relative_diff <= plausibility::AGREEMENT_TOLERANCE {
            return (ml_density, PredictionMethod::MlModel, self.config.model_confidence);
        }

        let model_weight = if ml_density <= cap * plausibility::RELAXED_BOUND_FACTOR {
            self.config.blend_model_weight_in_bounds
        } else {
            self.config.blend_model_weight_out_of_bounds
        };
        let blended = model_weight * ml_density + (1.0 - model_weight) * rule_density;

        // confidence decays from the top of the band toward the bottom as
        // disagreement grows
        let span = self.config.blend_confidence_max - self.config.blend_confidence_min;
        let penalty = ((relative_diff - plausibility::AGREEMENT_TOLERANCE)
            / (1.0 - plausibility::AGREEMENT_TOLERANCE))
            .clamp(0.0, 1.0);
        let confidence = self.config.blend_confidence_max - span * penalty;

        (blended, PredictionMethod::Blended, confidence)
    }
}

impl PredictionStrategy for ModelInferenceStrategy {
    fn name(&self) -> &'static str {
        "model_inference"
    }

    fn predict(&self, descriptor: &FoodDescriptor) -> Option<PredictionResult> {
        let features = self.extractor.prepare_features(descriptor, self.mode);
        let ml_density = match self.model.predict(&features.values) {
            Ok(value) => value,
            Err(err) => {
                warn!(food = %descriptor.name, error = %err, "model inference failed; falling back");
                return None;
            }
        };
        if !ml_density.is_finite() || ml_density <= 0.0 {
            debug!(food = %descriptor.name, ml_density, "non-physical model output; falling back");
            return None;
        }

        let preparation = self.extractor.effective_preparation(descriptor);
        let rule_density = base_density(descriptor.category) * preparation_multiplier(preparation);
        let (density, method, confidence) =
            self.validate_and_blend(ml_density, rule_density, descriptor.category);

        Some(build_result(
            density,
            effective_serving(descriptor),
            method,
            confidence,
            descriptor.category,
        ))
    }
}

/// Rule-based heuristic: category baseline density times preparation
/// multiplier. Terminal fallback, always answers.
pub struct RuleBasedStrategy {
    extractor: FeatureExtractor,
    confidence: f64,
}

impl RuleBasedStrategy {
    /// Create the rule-based strategy
    #[must_use]
    pub fn new(confidence: f64) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            confidence,
        }
    }
}

impl PredictionStrategy for RuleBasedStrategy {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn predict(&self, descriptor: &FoodDescriptor) -> Option<PredictionResult> {
        let preparation = self.extractor.effective_preparation(descriptor);
        let density = base_density(descriptor.category) * preparation_multiplier(preparation);
        Some(build_result(
            density,
            effective_serving(descriptor),
            PredictionMethod::RuleBased,
            self.confidence,
            descriptor.category,
        ))
    }
}

/// Hierarchical calorie predictor over an ordered strategy chain
pub struct CaloriePredictor {
    strategies: Vec<Box<dyn PredictionStrategy>>,
    monitor: Arc<UsageMonitor>,
}

impl CaloriePredictor {
    /// Build the standard chain: dataset lookup, model inference (when a
    /// model is available), rule-based fallback.
    ///
    /// A missing model degrades the chain rather than disabling it; that is
    /// reported once here, not per request.
    #[must_use]
    pub fn new(
        dataset: Arc<FoodDataset>,
        model: Option<Arc<dyn CalorieModel>>,
        monitor: Arc<UsageMonitor>,
        config: &PredictorConfig,
    ) -> Self {
        let mut strategies: Vec<Box<dyn PredictionStrategy>> = vec![Box::new(
            DatasetLookupStrategy::new(dataset, config.dataset_confidence),
        )];
        match model.and_then(|m| ModelInferenceStrategy::new(m, config.clone())) {
            Some(strategy) => strategies.push(Box::new(strategy)),
            None => warn!("calorie model unavailable; predictions use dataset and rules only"),
        }
        strategies.push(Box::new(RuleBasedStrategy::new(
            config.rule_based_confidence,
        )));
        Self {
            strategies,
            monitor,
        }
    }

    /// Predict calories for one food. Always answers; the rule-based tail of
    /// the chain cannot miss. Emits one usage entry regardless of the path
    /// taken.
    #[must_use]
    pub fn predict(&self, descriptor: &FoodDescriptor) -> PredictionResult {
        for strategy in &self.strategies {
            if let Some(result) = strategy.predict(descriptor) {
                debug!(
                    food = %descriptor.name,
                    strategy = strategy.name(),
                    method = result.method.as_str(),
                    confidence = result.confidence,
                    "prediction resolved"
                );
                self.monitor
                    .record(&UsageLogEntry::from_prediction(&descriptor.name, &result));
                return result;
            }
        }
        // unreachable in practice: RuleBasedStrategy always returns Some
        let fallback = build_result(
            base_density(descriptor.category),
            effective_serving(descriptor),
            PredictionMethod::RuleBased,
            0.5,
            descriptor.category,
        );
        self.monitor
            .record(&UsageLogEntry::from_prediction(&descriptor.name, &fallback));
        fallback
    }
}
