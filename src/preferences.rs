// ABOUTME: Preference matching: hard exclusions (plant_based, healthy) and soft tag scoring
// ABOUTME: Combines session-scoped filters with saved onboarding preferences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Preference filter.
//!
//! Two classes of tag with different guarantees: hard exclusions remove a
//! candidate outright (users selecting `plant_based` or `healthy` expect an
//! absolute guarantee), soft tags only adjust ranking. Session-scoped active
//! filters are primary; saved onboarding tags not re-selected this session
//! still contribute scoring weight but never override an explicit in-session
//! choice.

use crate::config::{HealthyThresholds, PreferenceWeights};
use crate::features::FeatureExtractor;
use crate::models::{FoodCategory, NutritionProfile, PreferenceTag};
use tracing::debug;

/// Comfort-food keywords: hearty, familiar dishes
const COMFORT_KEYWORDS: &[&str] = &[
    "adobo", "sinigang", "soup", "stew", "nilaga", "lugaw", "arroz caldo", "tinola", "kare",
    "spaghetti", "fried chicken",
];

/// Processed-meat keywords the `healthy` filter treats like fried food
const PROCESSED_MEAT_KEYWORDS: &[&str] = &[
    "hotdog", "spam", "longganisa", "tocino", "bacon", "sausage", "nugget", "corned beef",
];

/// Egg keywords for the `plant_based` exclusion
const EGG_KEYWORDS: &[&str] = &["egg", "itlog", "omelette", "tortang"];

/// High-protein keywords for the `protein` soft tag
const PROTEIN_KEYWORDS: &[&str] = &["protein", "egg", "tofu", "tokwa", "gym"];

/// Protein grams per serving above which the `protein` soft tag matches
const PROTEIN_TAG_THRESHOLD_G: f64 = 10.0;

/// One food entering the filter: identity, category, projected nutrition,
/// and the confidence of the underlying prediction
#[derive(Debug, Clone)]
pub struct CandidateFood {
    /// Food name
    pub name: String,
    /// Category the prediction was made under
    pub category: FoodCategory,
    /// Projected per-serving nutrition
    pub nutrition: NutritionProfile,
    /// Prediction confidence
    pub confidence: f64,
}

/// A candidate that survived filtering, annotated with its matches
#[derive(Debug, Clone)]
pub struct FilteredCandidate {
    /// The surviving food
    pub food: CandidateFood,
    /// Soft tags this food matched
    pub matched_tags: Vec<PreferenceTag>,
    /// Number of soft tags matched, active and saved combined
    pub match_count: usize,
    /// Weighted soft-tag score: active matches weigh more than saved ones
    pub weighted_score: f64,
}

/// Hard-exclusion plus soft-scoring preference filter
#[derive(Debug, Clone)]
pub struct PreferenceFilter {
    weights: PreferenceWeights,
    healthy: HealthyThresholds,
    extractor: FeatureExtractor,
}

impl Default for PreferenceFilter {
    fn default() -> Self {
        Self::new(PreferenceWeights::default(), HealthyThresholds::default())
    }
}

impl PreferenceFilter {
    /// Create a filter with the given weighting and thresholds
    #[must_use]
    pub fn new(weights: PreferenceWeights, healthy: HealthyThresholds) -> Self {
        Self {
            weights,
            healthy,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Apply hard exclusions and soft scoring.
    ///
    /// `active` tags take precedence; `saved` tags not already active are
    /// appended with reduced weight and only ever contribute score, never
    /// survival pressure. With N active soft tags a survivor must match at
    /// least `max(1, ceil(N/2))` of the active ones, so no single tag
    /// dominates a multi-tag selection.
    #[must_use]
    pub fn filter(
        &self,
        candidates: Vec<CandidateFood>,
        active: &[PreferenceTag],
        saved: &[PreferenceTag],
    ) -> Vec<FilteredCandidate> {
        // active filters first, then saved tags that add something new
        let mut effective: Vec<(PreferenceTag, bool)> =
            active.iter().map(|&tag| (tag, true)).collect();
        for &tag in saved {
            if !active.contains(&tag) {
                effective.push((tag, false));
            }
        }

        let soft_tags: Vec<(PreferenceTag, bool)> = effective
            .iter()
            .copied()
            .filter(|(tag, _)| !tag.is_hard_exclusion())
            .collect();
        let hard_tags: Vec<PreferenceTag> = effective
            .iter()
            .map(|&(tag, _)| tag)
            .filter(|tag| tag.is_hard_exclusion())
            .collect();

        // the survival bar counts only the session's explicit selection;
        // saved onboarding tags must not raise it
        let active_soft_count = soft_tags.iter().filter(|&&(_, is_active)| is_active).count();
        let required_matches = if active_soft_count == 0 {
            0
        } else {
            std::cmp::max(1, active_soft_count.div_ceil(2))
        };

        let mut survivors = Vec::with_capacity(candidates.len());
        for food in candidates {
            if hard_tags.iter().any(|&tag| self.excluded_by(tag, &food)) {
                debug!(food = %food.name, "removed by hard exclusion");
                continue;
            }

            let mut matched_tags = Vec::new();
            let mut weighted_score = 0.0;
            let mut active_matches = 0;
            for &(tag, is_active) in &soft_tags {
                if self.soft_match(tag, &food) {
                    matched_tags.push(tag);
                    if is_active {
                        active_matches += 1;
                        weighted_score += self.weights.active_filter_weight;
                    } else {
                        weighted_score += self.weights.saved_preference_weight;
                    }
                }
            }

            let match_count = matched_tags.len();
            if active_matches < required_matches {
                continue;
            }
            survivors.push(FilteredCandidate {
                food,
                matched_tags,
                match_count,
                weighted_score,
            });
        }
        survivors
    }

    /// Whether a hard tag removes this food
    fn excluded_by(&self, tag: PreferenceTag, food: &CandidateFood) -> bool {
        match tag {
            PreferenceTag::PlantBased => self.violates_plant_based(food),
            PreferenceTag::Healthy => self.violates_healthy(food),
            _ => false,
        }
    }

    fn violates_plant_based(&self, food: &CandidateFood) -> bool {
        food.category == FoodCategory::Meats
            || self.extractor.matches_meat_keyword(&food.name)
            || contains_any(&food.name, EGG_KEYWORDS)
    }

    /// Any single clause fires the exclusion. The dense-poor clause catches
    /// calorie-dense, nutritionally poor foods that are not literally fried.
    fn violates_healthy(&self, food: &CandidateFood) -> bool {
        let n = &food.nutrition;
        n.calories > self.healthy.max_calories_per_serving
            || n.fat_g > self.healthy.max_fat_g_per_serving
            || self.extractor.matches_fried_keyword(&food.name)
            || contains_any(&food.name, PROCESSED_MEAT_KEYWORDS)
            || (n.calories > self.healthy.dense_poor_calorie_floor
                && n.fiber_g < self.healthy.dense_poor_fiber_ceiling
                && n.protein_g < self.healthy.dense_poor_protein_ceiling)
    }

    /// Whether a soft tag matches this food
    fn soft_match(&self, tag: PreferenceTag, food: &CandidateFood) -> bool {
        let semantics = self.extractor.analyze_semantics(&food.name);
        match tag {
            PreferenceTag::Comfort => {
                contains_any(&food.name, COMFORT_KEYWORDS) || semantics.creamy
            }
            PreferenceTag::Spicy => semantics.spicy,
            PreferenceTag::Sweet => semantics.sweet || food.category == FoodCategory::Fruits,
            PreferenceTag::Protein => {
                food.nutrition.protein_g > PROTEIN_TAG_THRESHOLD_G
                    || food.category == FoodCategory::Meats
                    || contains_any(&food.name, PROTEIN_KEYWORDS)
            }
            // hard tags never soft-match
            PreferenceTag::PlantBased | PreferenceTag::Healthy => false,
        }
    }
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    let normalized = crate::dataset::normalize_name(name);
    keywords.iter().any(|kw| normalized.contains(kw))
}
