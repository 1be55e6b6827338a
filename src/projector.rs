// ABOUTME: Macro projection: decompose predicted calories into protein/carbs/fat/fiber
// ABOUTME: Category ratio tables plus frying oil-absorption fat adjustment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Nutrition projector.
//!
//! Deterministic derived calculation, not a learned model: no multi-output
//! training data exists, so macros come from documented category ratio
//! tables. Mixed categories (snacks in particular) are imprecise by nature;
//! the tables are an explicit approximation, not a bug to silently retune.
//!
//! Invariant: `protein*4 + carbs*4 + fat*9` reconciles with the serving
//! calories within 2%; rounding error is absorbed into the largest macro.

use crate::constants::{fiber, macro_ratios, preparation as prep_constants};
use crate::dataset::DatasetEntry;
use crate::models::{FoodCategory, NutritionProfile, PredictionResult, PreparationMethod};

/// Calories per gram of protein and carbohydrate
const KCAL_PER_G_PROTEIN_CARB: f64 = 4.0;
/// Calories per gram of fat
const KCAL_PER_G_FAT: f64 = 9.0;

/// Macro calorie fractions for a category: (protein, carbs, fat)
fn ratios_for(category: FoodCategory) -> (f64, f64, f64) {
    match category {
        FoodCategory::Meats => macro_ratios::MEATS,
        FoodCategory::Vegetables => macro_ratios::VEGETABLES,
        FoodCategory::Fruits => macro_ratios::FRUITS,
        FoodCategory::Grains => macro_ratios::GRAINS,
        FoodCategory::Dairy => macro_ratios::DAIRY,
        FoodCategory::Legumes => macro_ratios::LEGUMES,
        FoodCategory::Snacks => macro_ratios::SNACKS,
        FoodCategory::Beverages => macro_ratios::BEVERAGES,
        FoodCategory::Unknown => macro_ratios::UNKNOWN,
    }
}

/// Fiber grams per 100 g for a category
fn fiber_for(category: FoodCategory) -> f64 {
    match category {
        FoodCategory::Meats => fiber::MEATS,
        FoodCategory::Vegetables => fiber::VEGETABLES,
        FoodCategory::Fruits => fiber::FRUITS,
        FoodCategory::Grains => fiber::GRAINS,
        FoodCategory::Dairy => fiber::DAIRY,
        FoodCategory::Legumes => fiber::LEGUMES,
        FoodCategory::Snacks => fiber::SNACKS,
        FoodCategory::Beverages => fiber::BEVERAGES,
        FoodCategory::Unknown => fiber::UNKNOWN,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Absorb the gap between `calories` and the macro calorie sum into the
/// largest macro by calorie share
fn absorb_residual(calories: f64, protein_g: &mut f64, carbs_g: &mut f64, fat_g: &mut f64) {
    let protein_kcal = *protein_g * KCAL_PER_G_PROTEIN_CARB;
    let carb_kcal = *carbs_g * KCAL_PER_G_PROTEIN_CARB;
    let fat_kcal = *fat_g * KCAL_PER_G_FAT;
    let residual = calories - (protein_kcal + carb_kcal + fat_kcal);
    if fat_kcal >= protein_kcal && fat_kcal >= carb_kcal {
        *fat_g = (*fat_g + residual / KCAL_PER_G_FAT).max(0.0);
    } else if carb_kcal >= protein_kcal {
        *carbs_g = (*carbs_g + residual / KCAL_PER_G_PROTEIN_CARB).max(0.0);
    } else {
        *protein_g = (*protein_g + residual / KCAL_PER_G_PROTEIN_CARB).max(0.0);
    }
}

/// Derives a full macro profile from a calorie prediction
#[derive(Debug, Clone, Copy, Default)]
pub struct NutritionProjector;

impl NutritionProjector {
    /// Create a projector
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Project a calorie prediction into a per-serving macro profile.
    ///
    /// Frying shifts calories from carbohydrate into fat through the oil
    /// absorption constant; totals stay reconciled.
    #[must_use]
    pub fn project(
        &self,
        result: &PredictionResult,
        preparation: Option<PreparationMethod>,
        serving_size_grams: f64,
    ) -> NutritionProfile {
        let calories = result.total_calories.max(0.0);
        let (protein_frac, carb_frac, fat_frac) = ratios_for(result.category);

        let mut protein_g = calories * protein_frac / KCAL_PER_G_PROTEIN_CARB;
        let mut carbs_g = calories * carb_frac / KCAL_PER_G_PROTEIN_CARB;
        let mut fat_g = calories * fat_frac / KCAL_PER_G_FAT;

        // Frying absorbs oil: move the equivalent calories out of carbs so
        // the serving total is unchanged
        if preparation == Some(PreparationMethod::Fried) {
            let extra_fat_g = prep_constants::FRYING_OIL_FAT_G_PER_100G * serving_size_grams / 100.0;
            let extra_fat_g =
                extra_fat_g.min(carbs_g * KCAL_PER_G_PROTEIN_CARB / KCAL_PER_G_FAT);
            fat_g += extra_fat_g;
            carbs_g -= extra_fat_g * KCAL_PER_G_FAT / KCAL_PER_G_PROTEIN_CARB;
        }

        protein_g = round1(protein_g);
        carbs_g = round1(carbs_g);
        fat_g = round1(fat_g);
        absorb_residual(calories, &mut protein_g, &mut carbs_g, &mut fat_g);

        NutritionProfile {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g: round1(fiber_for(result.category) * serving_size_grams.max(0.0) / 100.0),
        }
    }

    /// Scale a known food's measured macros to a serving.
    ///
    /// Dataset hits keep their ground-truth macros instead of the category
    /// ratio approximation. Measured macros rarely sum exactly to the
    /// labeled calories (fiber and water account for the gap), so the
    /// residual is absorbed the same way as in [`Self::project`] to keep the
    /// serving profile reconciled.
    #[must_use]
    pub fn project_measured(
        &self,
        entry: &DatasetEntry,
        serving_size_grams: f64,
    ) -> NutritionProfile {
        let scale = serving_size_grams.max(0.0) / 100.0;
        let calories = entry.calories_per_100g.max(0.0) * scale;
        let mut protein_g = round1(entry.protein_g.max(0.0) * scale);
        let mut carbs_g = round1(entry.carbs_g.max(0.0) * scale);
        let mut fat_g = round1(entry.fat_g.max(0.0) * scale);
        absorb_residual(calories, &mut protein_g, &mut carbs_g, &mut fat_g);

        NutritionProfile {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g: round1(entry.fiber_g.max(0.0) * scale),
        }
    }
}
