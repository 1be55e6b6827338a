// ABOUTME: Composite recommendation scoring over filtered candidates
// ABOUTME: Calorie-target fit, goal alignment, preferences, meal slot, activity/sex emphasis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Recommendation scorer.
//!
//! Each sub-score is normalized to 0..1 and combined through the configured
//! weights. The per-meal calorie target derives from the user profile:
//! Mifflin-St Jeor BMR, activity-factor TDEE, goal adjustment, then the
//! requested meal slot's share. Output order is fully deterministic:
//! composite score descending, then prediction confidence descending, then
//! lexical name order.

use crate::config::ScorerWeights;
use crate::constants::{energy, meal_split};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ActivityLevel, FoodCategory, Goal, MealType, ScoredCandidate, Sex, UserProfile,
};
use crate::preferences::FilteredCandidate;
use rayon::prelude::*;

/// Basal metabolic rate via Mifflin-St Jeor (1990)
///
/// # Errors
///
/// Returns `ValueOutOfRange` for weights/heights outside 0-300 or ages
/// outside 10-120, the ranges the formula was validated for.
pub fn basal_metabolic_rate(profile: &UserProfile) -> AppResult<f64> {
    if profile.weight_kg <= 0.0 || profile.weight_kg > 300.0 {
        return Err(AppError::out_of_range("weight must be between 0 and 300 kg"));
    }
    if profile.height_cm <= 0.0 || profile.height_cm > 300.0 {
        return Err(AppError::out_of_range("height must be between 0 and 300 cm"));
    }
    if !(10..=120).contains(&profile.age) {
        return Err(AppError::out_of_range("age must be between 10 and 120 years"));
    }

    let sex_constant = match profile.sex {
        Sex::Male => energy::MSJ_MALE_CONSTANT,
        Sex::Female => energy::MSJ_FEMALE_CONSTANT,
    };
    let bmr = energy::MSJ_WEIGHT_COEF * profile.weight_kg
        + energy::MSJ_HEIGHT_COEF * profile.height_cm
        + energy::MSJ_AGE_COEF * f64::from(profile.age)
        + sex_constant;
    Ok(bmr.max(energy::MIN_BMR))
}

/// Activity multiplier for total daily energy expenditure
#[must_use]
pub fn activity_factor(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => energy::FACTOR_SEDENTARY,
        ActivityLevel::LightlyActive => energy::FACTOR_LIGHTLY_ACTIVE,
        ActivityLevel::ModeratelyActive => energy::FACTOR_MODERATELY_ACTIVE,
        ActivityLevel::VeryActive => energy::FACTOR_VERY_ACTIVE,
        ActivityLevel::ExtraActive => energy::FACTOR_EXTRA_ACTIVE,
    }
}

/// Goal-adjusted daily calorie target for a profile
///
/// # Errors
///
/// Propagates range errors from [`basal_metabolic_rate`].
pub fn daily_calorie_target(profile: &UserProfile) -> AppResult<f64> {
    let tdee = basal_metabolic_rate(profile)? * activity_factor(profile.activity_level);
    let adjusted = match profile.goal {
        Goal::LoseWeight => tdee + energy::LOSE_WEIGHT_ADJUSTMENT,
        Goal::MaintainWeight => tdee,
        Goal::GainMuscle => tdee + energy::GAIN_MUSCLE_ADJUSTMENT,
    };
    Ok(adjusted.max(energy::MIN_DAILY_TARGET))
}

/// Share of the daily target allotted to a meal slot
#[must_use]
pub fn meal_fraction(meal_type: MealType) -> f64 {
    match meal_type {
        MealType::Breakfast => meal_split::BREAKFAST,
        MealType::Lunch => meal_split::LUNCH,
        MealType::Dinner => meal_split::DINNER,
        MealType::Snack => meal_split::SNACK,
    }
}

/// Calorie target for one meal of the requested slot
///
/// # Errors
///
/// Propagates range errors from [`basal_metabolic_rate`].
pub fn per_meal_target(profile: &UserProfile, meal_type: MealType) -> AppResult<f64> {
    Ok(daily_calorie_target(profile)? * meal_fraction(meal_type))
}

/// Categories conventionally associated with each meal slot
fn meal_slot_categories(meal_type: MealType) -> &'static [FoodCategory] {
    match meal_type {
        MealType::Breakfast => &[
            FoodCategory::Grains,
            FoodCategory::Dairy,
            FoodCategory::Fruits,
        ],
        MealType::Lunch | MealType::Dinner => &[
            FoodCategory::Meats,
            FoodCategory::Vegetables,
            FoodCategory::Grains,
            FoodCategory::Legumes,
        ],
        MealType::Snack => &[
            FoodCategory::Snacks,
            FoodCategory::Fruits,
            FoodCategory::Beverages,
        ],
    }
}

/// Weighted composite ranker over filtered candidates
#[derive(Debug, Clone, Default)]
pub struct RecommendationScorer {
    weights: ScorerWeights,
}

impl RecommendationScorer {
    /// Create a scorer with the given weights
    #[must_use]
    pub fn new(weights: ScorerWeights) -> Self {
        Self { weights }
    }

    /// Decaying fit to the per-meal calorie target; no hard cutoff, a food
    /// twice the target still scores, just low
    fn calorie_fit(meal_target: f64, calories: f64) -> f64 {
        if meal_target <= 0.0 {
            return 0.0;
        }
        (-(calories - meal_target).abs() / meal_target).exp()
    }

    /// Bonus/penalty from the user's goal
    fn goal_alignment(goal: Goal, candidate: &FilteredCandidate, meal_target: f64) -> f64 {
        let n = &candidate.food.nutrition;
        match goal {
            Goal::LoseWeight => {
                // lower-calorie and high-fiber foods favored
                let calorie_part = if meal_target > 0.0 {
                    (1.0 - n.calories / meal_target).clamp(-0.5, 0.5)
                } else {
                    0.0
                };
                (0.5 + 0.6 * calorie_part + 0.2 * (n.fiber_g / 5.0).min(1.0)).clamp(0.0, 1.0)
            }
            Goal::MaintainWeight => 0.6,
            Goal::GainMuscle => 0.4 + 0.6 * (n.protein_g / 30.0).min(1.0),
        }
    }

    /// Weighted soft-tag matches, saturating at 1.0
    fn preference_match(candidate: &FilteredCandidate) -> f64 {
        candidate.weighted_score.min(1.0)
    }

    /// Bonus when the food's category is conventional for the slot
    fn meal_type_fit(meal_type: MealType, category: FoodCategory) -> f64 {
        if meal_slot_categories(meal_type).contains(&category) {
            1.0
        } else {
            0.3
        }
    }

    /// Small adjustment for activity level and sex-specific nutrient
    /// emphasis (iron-rich categories weighted up for female users)
    fn activity_adjustment(profile: &UserProfile, candidate: &FilteredCandidate) -> f64 {
        let n = &candidate.food.nutrition;
        let mut score: f64 = 0.5;
        match profile.activity_level {
            ActivityLevel::VeryActive | ActivityLevel::ExtraActive => {
                score += 0.3 * (n.protein_g / 25.0).min(1.0);
            }
            ActivityLevel::Sedentary => {
                if n.calories < 300.0 {
                    score += 0.2;
                }
            }
            ActivityLevel::LightlyActive | ActivityLevel::ModeratelyActive => {}
        }
        if profile.sex == Sex::Female
            && matches!(
                candidate.food.category,
                FoodCategory::Meats | FoodCategory::Legumes
            )
        {
            score += 0.2;
        }
        score.clamp(0.0, 1.0)
    }

    /// Composite score for one candidate
    #[must_use]
    pub fn score(
        &self,
        candidate: &FilteredCandidate,
        profile: &UserProfile,
        meal_type: MealType,
        meal_target: f64,
    ) -> f64 {
        let n = &candidate.food.nutrition;
        self.weights.calorie_fit * Self::calorie_fit(meal_target, n.calories)
            + self.weights.goal_alignment
                * Self::goal_alignment(profile.goal, candidate, meal_target)
            + self.weights.preference_match * Self::preference_match(candidate)
            + self.weights.meal_type_fit * Self::meal_type_fit(meal_type, candidate.food.category)
            + self.weights.activity_adjustment * Self::activity_adjustment(profile, candidate)
    }

    /// Rank candidates and return the top `top_n` in descending score order.
    ///
    /// Scores are computed in parallel; ordering comes from one stable sort
    /// afterwards, so identical inputs always produce identical output.
    ///
    /// # Errors
    ///
    /// Propagates profile range errors from the calorie-target calculation.
    pub fn rank(
        &self,
        candidates: Vec<FilteredCandidate>,
        profile: &UserProfile,
        meal_type: MealType,
        top_n: usize,
    ) -> AppResult<Vec<ScoredCandidate>> {
        let meal_target = per_meal_target(profile, meal_type)?;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_par_iter()
            .map(|candidate| {
                let score = self.score(&candidate, profile, meal_type, meal_target);
                ScoredCandidate {
                    name: candidate.food.name,
                    nutrition: candidate.food.nutrition,
                    score,
                    matched_tags: candidate.matched_tags,
                    confidence: candidate.food.confidence,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
                .then_with(|| a.name.cmp(&b.name))
        });
        scored.truncate(top_n);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionProfile;
    use crate::preferences::CandidateFood;

    fn profile(goal: Goal) -> UserProfile {
        UserProfile {
            sex: Sex::Male,
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            activity_level: ActivityLevel::ModeratelyActive,
            goal,
            dietary_preferences: vec![],
        }
    }

    fn candidate(name: &str, category: FoodCategory, calories: f64, protein: f64) -> FilteredCandidate {
        FilteredCandidate {
            food: CandidateFood {
                name: name.to_owned(),
                category,
                nutrition: NutritionProfile {
                    calories,
                    protein_g: protein,
                    carbs_g: 30.0,
                    fat_g: 10.0,
                    fiber_g: 2.0,
                },
                confidence: 0.8,
            },
            matched_tags: vec![],
            match_count: 0,
            weighted_score: 0.0,
        }
    }

    #[test]
    fn bmr_matches_mifflin_st_jeor_reference_values() {
        // 70 kg, 175 cm, 30 y male: 10*70 + 6.25*175 - 5*30 + 5 = 1648.75
        let bmr = basal_metabolic_rate(&profile(Goal::MaintainWeight)).unwrap();
        assert!((bmr - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn daily_target_reflects_goal_adjustment() {
        let maintain = daily_calorie_target(&profile(Goal::MaintainWeight)).unwrap();
        let lose = daily_calorie_target(&profile(Goal::LoseWeight)).unwrap();
        let gain = daily_calorie_target(&profile(Goal::GainMuscle)).unwrap();
        assert!((maintain - lose - 500.0).abs() < 1e-9);
        assert!((gain - maintain - 300.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_profile_is_rejected() {
        let mut bad = profile(Goal::MaintainWeight);
        bad.age = 5;
        assert!(basal_metabolic_rate(&bad).is_err());
        let mut bad = profile(Goal::MaintainWeight);
        bad.weight_kg = 0.0;
        assert!(basal_metabolic_rate(&bad).is_err());
    }

    #[test]
    fn per_meal_target_splits_by_slot() {
        let p = profile(Goal::MaintainWeight);
        let daily = daily_calorie_target(&p).unwrap();
        let lunch = per_meal_target(&p, MealType::Lunch).unwrap();
        assert!((lunch - daily * 0.35).abs() < 1e-9);
    }

    #[test]
    fn closer_to_target_scores_higher() {
        let scorer = RecommendationScorer::default();
        let p = profile(Goal::MaintainWeight);
        let target = per_meal_target(&p, MealType::Lunch).unwrap();
        let near = candidate("near", FoodCategory::Grains, target, 10.0);
        let far = candidate("far", FoodCategory::Grains, target * 3.0, 10.0);
        let near_score = scorer.score(&near, &p, MealType::Lunch, target);
        let far_score = scorer.score(&far, &p, MealType::Lunch, target);
        assert!(near_score > far_score);
    }

    #[test]
    fn gain_muscle_favors_protein() {
        let scorer = RecommendationScorer::default();
        let p = profile(Goal::GainMuscle);
        let target = per_meal_target(&p, MealType::Dinner).unwrap();
        let high = candidate("high protein", FoodCategory::Meats, 400.0, 35.0);
        let low = candidate("low protein", FoodCategory::Meats, 400.0, 3.0);
        assert!(
            scorer.score(&high, &p, MealType::Dinner, target)
                > scorer.score(&low, &p, MealType::Dinner, target)
        );
    }

    #[test]
    fn meal_slot_association_beats_mismatch() {
        let scorer = RecommendationScorer::default();
        let p = profile(Goal::MaintainWeight);
        let target = per_meal_target(&p, MealType::Breakfast).unwrap();
        let grains = candidate("oatmeal", FoodCategory::Grains, target, 8.0);
        let snack = candidate("oat bar", FoodCategory::Snacks, target, 8.0);
        assert!(
            scorer.score(&grains, &p, MealType::Breakfast, target)
                > scorer.score(&snack, &p, MealType::Breakfast, target)
        );
    }

    #[test]
    fn ranking_is_deterministic_with_lexical_tiebreak() {
        let scorer = RecommendationScorer::default();
        let p = profile(Goal::MaintainWeight);
        let twins = vec![
            candidate("beta dish", FoodCategory::Grains, 400.0, 10.0),
            candidate("alpha dish", FoodCategory::Grains, 400.0, 10.0),
        ];
        let first = scorer
            .rank(twins.clone(), &p, MealType::Lunch, 10)
            .unwrap();
        let second = scorer.rank(twins, &p, MealType::Lunch, 10).unwrap();
        let names: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha dish", "beta dish"]);
        assert_eq!(
            names,
            second.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn top_n_truncates_descending_order() {
        let scorer = RecommendationScorer::default();
        let p = profile(Goal::MaintainWeight);
        let target = per_meal_target(&p, MealType::Lunch).unwrap();
        let candidates = vec![
            candidate("near target", FoodCategory::Grains, target, 10.0),
            candidate("way over", FoodCategory::Grains, target * 4.0, 10.0),
            candidate("over", FoodCategory::Grains, target * 2.0, 10.0),
        ];
        let ranked = scorer.rank(candidates, &p, MealType::Lunch, 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].score >= ranked[1].score);
        assert_eq!(ranked[0].name, "near target");
    }
}
