// ABOUTME: Top-level engine facade wiring predictor, projector, filter, and scorer
// ABOUTME: Built once at startup, then shared read-only across request handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Engine facade.
//!
//! [`NutritionEngine`] owns the fully wired pipeline. Construction takes the
//! dataset, the optional calorie model, and the usage monitor; everything
//! else derives from [`EngineConfig`]. The engine is `Send + Sync` and all
//! entry points take `&self`, so one instance serves concurrent callers.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::dataset::FoodDataset;
use crate::errors::AppResult;
use crate::features::FeatureExtractor;
use crate::model::CalorieModel;
use crate::models::{
    FoodDescriptor, MealPrediction, MealType, PredictionMethod, PreferenceTag, ScoredCandidate,
    UserProfile,
};
use crate::monitor::{UsageMonitor, UsageStatistics};
use crate::predictor::CaloriePredictor;
use crate::preferences::{CandidateFood, PreferenceFilter};
use crate::projector::NutritionProjector;
use crate::scorer::RecommendationScorer;

/// Fully wired prediction and recommendation pipeline
pub struct NutritionEngine {
    predictor: CaloriePredictor,
    dataset: Arc<FoodDataset>,
    projector: NutritionProjector,
    filter: PreferenceFilter,
    scorer: RecommendationScorer,
    extractor: FeatureExtractor,
    monitor: Arc<UsageMonitor>,
    default_top_n: usize,
}

impl NutritionEngine {
    /// Wire the pipeline from its parts.
    ///
    /// `model` is optional; without one the predictor chain falls back to
    /// dataset lookup and rule-based estimation.
    #[must_use]
    pub fn new(
        dataset: Arc<FoodDataset>,
        model: Option<Arc<dyn CalorieModel>>,
        monitor: Arc<UsageMonitor>,
        config: EngineConfig,
    ) -> Self {
        info!(
            dataset_entries = dataset.len(),
            model_loaded = model.is_some(),
            "nutrition engine initialized"
        );
        Self {
            predictor: CaloriePredictor::new(
                Arc::clone(&dataset),
                model,
                Arc::clone(&monitor),
                &config.predictor,
            ),
            dataset,
            projector: NutritionProjector::new(),
            filter: PreferenceFilter::new(config.preferences, config.healthy),
            scorer: RecommendationScorer::new(config.scorer),
            extractor: FeatureExtractor::new(),
            monitor,
            default_top_n: config.limits.default_top_n,
        }
    }

    /// Engine over the built-in dataset with default configuration and no
    /// model. Useful for tests and for deployments without a trained model.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(FoodDataset::builtin()),
            None,
            Arc::new(UsageMonitor::new()),
            EngineConfig::default(),
        )
    }

    /// Predict calories and project the full macro profile for one food.
    ///
    /// Dataset hits keep the dataset's own measured macros; everything else
    /// goes through the category ratio projection. Never fails: the
    /// predictor chain always answers and both projections are total.
    /// Malformed serving sizes fall back to the 100 g default inside the
    /// predictor.
    #[must_use]
    pub fn predict_nutrition(&self, descriptor: &FoodDescriptor) -> MealPrediction {
        let prediction = self.predictor.predict(descriptor);
        let serving = if descriptor.serving_size_grams > 0.0 {
            descriptor.serving_size_grams
        } else {
            crate::predictor::DEFAULT_SERVING_GRAMS
        };
        let measured = if prediction.method == PredictionMethod::DatabaseLookup {
            self.dataset.lookup(&descriptor.name)
        } else {
            None
        };
        let nutrition = match measured {
            Some(entry) => self.projector.project_measured(entry, serving),
            None => {
                let preparation = self.extractor.effective_preparation(descriptor);
                self.projector.project(&prediction, preparation, serving)
            }
        };
        MealPrediction {
            prediction,
            nutrition,
        }
    }

    /// Rank candidate foods for a user, meal slot, and preference selection.
    ///
    /// Each candidate runs through the prediction pipeline (emitting usage
    /// entries as any other prediction would), then hard/soft preference
    /// filtering, then composite scoring. `top_n` defaults to the configured
    /// limit when `None`.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when the profile's age, weight, or height
    /// fall outside the supported ranges for the calorie-target formula.
    pub fn recommend(
        &self,
        candidates: &[FoodDescriptor],
        profile: &UserProfile,
        meal_type: MealType,
        active_preferences: &[PreferenceTag],
        top_n: Option<usize>,
    ) -> AppResult<Vec<ScoredCandidate>> {
        let candidate_foods: Vec<CandidateFood> = candidates
            .iter()
            .map(|descriptor| {
                let meal = self.predict_nutrition(descriptor);
                CandidateFood {
                    name: descriptor.name.clone(),
                    category: meal.prediction.category,
                    nutrition: meal.nutrition,
                    confidence: meal.prediction.confidence,
                }
            })
            .collect();

        let filtered = self.filter.filter(
            candidate_foods,
            active_preferences,
            &profile.dietary_preferences,
        );
        debug!(
            candidates = candidates.len(),
            survivors = filtered.len(),
            "preference filtering complete"
        );

        self.scorer.rank(
            filtered,
            profile,
            meal_type,
            top_n.unwrap_or(self.default_top_n),
        )
    }

    /// Snapshot of usage counters accumulated so far
    #[must_use]
    pub fn usage_statistics(&self) -> UsageStatistics {
        self.monitor.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, FoodCategory, Goal, PredictionMethod, Sex};

    fn profile() -> UserProfile {
        UserProfile {
            sex: Sex::Female,
            age: 28,
            weight_kg: 58.0,
            height_cm: 160.0,
            activity_level: ActivityLevel::LightlyActive,
            goal: Goal::MaintainWeight,
            dietary_preferences: vec![],
        }
    }

    #[test]
    fn predict_nutrition_uses_dataset_for_known_food() {
        let engine = NutritionEngine::builtin();
        let meal = engine
            .predict_nutrition(&FoodDescriptor::new("white rice", FoodCategory::Unknown, 150.0));
        assert_eq!(meal.prediction.method, PredictionMethod::DatabaseLookup);
        assert!((meal.prediction.total_calories - 195.0).abs() < 1e-9);
        assert!(meal.nutrition.calories > 0.0);
    }

    #[test]
    fn dataset_hits_carry_the_dataset_macros() {
        let engine = NutritionEngine::builtin();
        let meal = engine
            .predict_nutrition(&FoodDescriptor::new("white rice", FoodCategory::Unknown, 100.0));

        // measured values, not the grains ratio row: rice is nearly fat-free
        assert!(meal.nutrition.fat_g < 1.0);
        assert!((meal.nutrition.protein_g - 2.7).abs() < 0.5);
        assert!(meal.nutrition.carbs_g > 27.0);

        // and a fatty known food is judged on its real fat content
        let kawali = engine.predict_nutrition(&FoodDescriptor::new(
            "lechon kawali",
            FoodCategory::Unknown,
            100.0,
        ));
        assert!(kawali.nutrition.fat_g > 30.0);
    }

    #[test]
    fn unknown_food_still_answers_via_rules() {
        let engine = NutritionEngine::builtin();
        let meal = engine
            .predict_nutrition(&FoodDescriptor::new("mystery stew", FoodCategory::Unknown, 200.0));
        assert_eq!(meal.prediction.method, PredictionMethod::RuleBased);
        assert!(meal.prediction.total_calories > 0.0);
    }

    #[test]
    fn recommend_excludes_meat_for_plant_based() {
        let engine = NutritionEngine::builtin();
        let candidates = vec![
            FoodDescriptor::new("chicken adobo", FoodCategory::Unknown, 250.0),
            FoodDescriptor::new("mango", FoodCategory::Unknown, 120.0),
            FoodDescriptor::new("tofu sinigang", FoodCategory::Unknown, 300.0),
        ];
        let ranked = engine
            .recommend(
                &candidates,
                &profile(),
                MealType::Lunch,
                &[PreferenceTag::PlantBased],
                None,
            )
            .unwrap();
        assert!(ranked.iter().all(|c| c.name != "chicken adobo"));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn recommend_honors_top_n() {
        let engine = NutritionEngine::builtin();
        let candidates = vec![
            FoodDescriptor::new("white rice", FoodCategory::Unknown, 150.0),
            FoodDescriptor::new("mango", FoodCategory::Unknown, 120.0),
            FoodDescriptor::new("tofu", FoodCategory::Unknown, 100.0),
        ];
        let ranked = engine
            .recommend(&candidates, &profile(), MealType::Lunch, &[], Some(1))
            .unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn recommend_rejects_invalid_profile() {
        let engine = NutritionEngine::builtin();
        let mut bad = profile();
        bad.height_cm = -1.0;
        let err = engine
            .recommend(
                &[FoodDescriptor::new("mango", FoodCategory::Unknown, 100.0)],
                &bad,
                MealType::Snack,
                &[],
                None,
            )
            .unwrap_err();
        assert!(err.message.contains("height"));
    }

    #[test]
    fn usage_statistics_count_engine_predictions() {
        let engine = NutritionEngine::builtin();
        engine.predict_nutrition(&FoodDescriptor::new("white rice", FoodCategory::Unknown, 100.0));
        engine.predict_nutrition(&FoodDescriptor::new("mystery stew", FoodCategory::Unknown, 100.0));
        let stats = engine.usage_statistics();
        assert_eq!(stats.total_predictions, 2);
        assert_eq!(
            stats.by_method.get(&PredictionMethod::DatabaseLookup),
            Some(&1)
        );
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NutritionEngine>();
    }
}
