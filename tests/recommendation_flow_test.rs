// ABOUTME: Integration tests for preference filtering and recommendation ranking
// ABOUTME: Covers hard exclusions, soft-tag survival, scoring order, and determinism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Recommendation Flow Tests
//!
//! Exercises the full recommend path through the engine facade: candidate
//! prediction, dietary preference filtering, and deterministic top-N
//! ranking against a user profile.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use kusina_intelligence::engine::NutritionEngine;
use kusina_intelligence::models::{
    ActivityLevel, FoodCategory, FoodDescriptor, Goal, MealType, PreferenceTag, Sex, UserProfile,
};

fn profile_with(goal: Goal, preferences: Vec<PreferenceTag>) -> UserProfile {
    UserProfile {
        sex: Sex::Male,
        age: 32,
        weight_kg: 72.0,
        height_cm: 170.0,
        activity_level: ActivityLevel::ModeratelyActive,
        goal,
        dietary_preferences: preferences,
    }
}

fn lunch_candidates() -> Vec<FoodDescriptor> {
    vec![
        FoodDescriptor::new("chicken adobo", FoodCategory::Meats, 250.0),
        FoodDescriptor::new("mango", FoodCategory::Fruits, 120.0),
        FoodDescriptor::new("tofu sinigang", FoodCategory::Legumes, 300.0),
        FoodDescriptor::new("white rice", FoodCategory::Grains, 150.0),
    ]
}

#[test]
fn plant_based_excludes_meat_candidates() {
    let engine = NutritionEngine::builtin();
    let ranked = engine
        .recommend(
            &lunch_candidates(),
            &profile_with(Goal::MaintainWeight, vec![]),
            MealType::Lunch,
            &[PreferenceTag::PlantBased],
            None,
        )
        .unwrap();

    let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
    assert!(!names.contains(&"chicken adobo"));
    assert!(names.contains(&"mango"));
    assert!(names.contains(&"tofu sinigang"));
}

#[test]
fn saved_profile_preferences_apply_without_active_selection() {
    let engine = NutritionEngine::builtin();
    let ranked = engine
        .recommend(
            &lunch_candidates(),
            &profile_with(Goal::MaintainWeight, vec![PreferenceTag::PlantBased]),
            MealType::Lunch,
            &[],
            None,
        )
        .unwrap();

    assert!(ranked.iter().all(|c| c.name != "chicken adobo"));
}

#[test]
fn no_preferences_keeps_every_candidate() {
    let engine = NutritionEngine::builtin();
    let ranked = engine
        .recommend(
            &lunch_candidates(),
            &profile_with(Goal::MaintainWeight, vec![]),
            MealType::Lunch,
            &[],
            None,
        )
        .unwrap();

    assert_eq!(ranked.len(), 4);
}

#[test]
fn results_are_sorted_descending_and_truncated() {
    let engine = NutritionEngine::builtin();
    let ranked = engine
        .recommend(
            &lunch_candidates(),
            &profile_with(Goal::MaintainWeight, vec![]),
            MealType::Lunch,
            &[],
            Some(2),
        )
        .unwrap();

    assert_eq!(ranked.len(), 2);
    assert!(ranked[0].score >= ranked[1].score);
}

#[test]
fn ranking_is_reproducible_across_runs() {
    let engine = NutritionEngine::builtin();
    let profile = profile_with(Goal::GainMuscle, vec![]);
    let first = engine
        .recommend(&lunch_candidates(), &profile, MealType::Dinner, &[], None)
        .unwrap();
    let second = engine
        .recommend(&lunch_candidates(), &profile, MealType::Dinner, &[], None)
        .unwrap();

    let first_names: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
    let second_names: Vec<&str> = second.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(first_names, second_names);
    for (a, b) in first.iter().zip(&second) {
        assert!((a.score - b.score).abs() < 1e-12);
    }
}

#[test]
fn gain_muscle_ranks_protein_rich_meat_above_fruit() {
    let engine = NutritionEngine::builtin();
    let ranked = engine
        .recommend(
            &lunch_candidates(),
            &profile_with(Goal::GainMuscle, vec![]),
            MealType::Dinner,
            &[],
            None,
        )
        .unwrap();

    let position = |name: &str| ranked.iter().position(|c| c.name == name).unwrap();
    assert!(position("chicken adobo") < position("mango"));
}

#[test]
fn healthy_filter_judges_known_foods_on_their_measured_macros() {
    let engine = NutritionEngine::builtin();
    let candidates = vec![
        // 16 g fat per 100 g in the lookup table; at 160 g that is 25.6 g,
        // over the healthy fat threshold, while the dairy ratio row would
        // understate it at roughly 15 g
        FoodDescriptor::new("kesong puti", FoodCategory::Unknown, 160.0),
        FoodDescriptor::new("pinakbet", FoodCategory::Unknown, 160.0),
    ];
    let ranked = engine
        .recommend(
            &candidates,
            &profile_with(Goal::MaintainWeight, vec![]),
            MealType::Dinner,
            &[PreferenceTag::Healthy],
            None,
        )
        .unwrap();

    let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["pinakbet"]);
}

#[test]
fn invalid_profile_is_rejected_before_scoring() {
    let engine = NutritionEngine::builtin();
    let mut profile = profile_with(Goal::MaintainWeight, vec![]);
    profile.age = 200;

    let err = engine
        .recommend(&lunch_candidates(), &profile, MealType::Lunch, &[], None)
        .unwrap_err();
    assert!(err.message.contains("age"));
}

#[test]
fn recommendation_predictions_feed_usage_statistics() {
    let engine = NutritionEngine::builtin();
    engine
        .recommend(
            &lunch_candidates(),
            &profile_with(Goal::MaintainWeight, vec![]),
            MealType::Lunch,
            &[],
            None,
        )
        .unwrap();

    let stats = engine.usage_statistics();
    assert_eq!(stats.total_predictions, 4);
}
