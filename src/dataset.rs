// ABOUTME: Known-food lookup table with ground-truth per-100g nutrition
// ABOUTME: Loaded once at startup, normalized-name lookup, immutable thereafter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Food dataset: the first and most trusted rung of the prediction hierarchy.
//!
//! Lookup is insensitive to case, surrounding whitespace, and the
//! hyphen/underscore/space variations users actually type ("chicken-adobo",
//! "Chicken_Adobo", " chicken adobo ").

use crate::errors::{AppError, AppResult};
use crate::models::FoodCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Ground-truth nutrition for one known food, per 100 g
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Calories per 100 g
    pub calories_per_100g: f64,
    /// Protein grams per 100 g
    pub protein_g: f64,
    /// Carbohydrate grams per 100 g
    pub carbs_g: f64,
    /// Fat grams per 100 g
    pub fat_g: f64,
    /// Fiber grams per 100 g
    pub fiber_g: f64,
    /// Category this food belongs to
    pub category: FoodCategory,
}

/// Read-only lookup table of known foods keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct FoodDataset {
    entries: HashMap<String, DatasetEntry>,
}

/// Normalize a food name for lookup: lowercase, squash separator runs to a
/// single space, trim
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_space = true;
    for ch in name.chars() {
        let mapped = match ch {
            '-' | '_' => ' ',
            c => c,
        };
        if mapped.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            for lower in mapped.to_lowercase() {
                out.push(lower);
            }
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

impl FoodDataset {
    /// Build a dataset from raw name/entry pairs
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, DatasetEntry)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(name, entry)| (normalize_name(&name), entry))
            .collect();
        Self { entries }
    }

    /// Load a dataset from a JSON file mapping food name to entry
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file is unreadable or not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config_error(format!("failed to read dataset {}", path.display()))
                .with_source(e)
        })?;
        let parsed: HashMap<String, DatasetEntry> = serde_json::from_str(&raw).map_err(|e| {
            AppError::config_error(format!("invalid dataset JSON in {}", path.display()))
                .with_source(e)
        })?;
        let dataset = Self::from_entries(parsed);
        info!(foods = dataset.len(), path = %path.display(), "food dataset loaded");
        Ok(dataset)
    }

    /// Built-in seed dataset shipped with the engine
    #[must_use]
    pub fn builtin() -> Self {
        let rows: &[(&str, f64, f64, f64, f64, f64, FoodCategory)] = &[
            // name, kcal/100g, protein, carbs, fat, fiber
            ("white rice", 130.0, 2.7, 28.0, 0.3, 0.4, FoodCategory::Grains),
            ("garlic fried rice", 190.0, 3.5, 32.0, 5.5, 0.6, FoodCategory::Grains),
            ("pandesal", 310.0, 9.0, 57.0, 5.0, 2.3, FoodCategory::Grains),
            ("mango", 60.0, 0.8, 15.0, 0.4, 1.6, FoodCategory::Fruits),
            ("banana", 89.0, 1.1, 23.0, 0.3, 2.6, FoodCategory::Fruits),
            ("grilled bangus", 150.0, 21.0, 0.0, 7.0, 0.0, FoodCategory::Meats),
            ("lechon kawali", 420.0, 18.0, 1.0, 38.0, 0.0, FoodCategory::Meats),
            ("pork sisig", 300.0, 17.0, 4.0, 24.0, 0.3, FoodCategory::Meats),
            ("chicken inasal", 185.0, 24.0, 2.0, 9.0, 0.0, FoodCategory::Meats),
            ("tofu", 76.0, 8.0, 1.9, 4.8, 0.3, FoodCategory::Legumes),
            ("monggo guisado", 105.0, 7.0, 16.0, 1.5, 5.5, FoodCategory::Legumes),
            ("pinakbet", 65.0, 2.5, 9.0, 2.5, 3.0, FoodCategory::Vegetables),
            ("ensaladang talong", 55.0, 1.5, 8.0, 2.0, 2.8, FoodCategory::Vegetables),
            ("kesong puti", 215.0, 14.0, 3.0, 16.0, 0.0, FoodCategory::Dairy),
            ("banana chips", 520.0, 2.3, 58.0, 34.0, 7.7, FoodCategory::Snacks),
            ("halo halo", 160.0, 2.5, 30.0, 3.5, 1.0, FoodCategory::Beverages),
            ("buko juice", 19.0, 0.7, 3.7, 0.2, 1.1, FoodCategory::Beverages),
        ];
        let entries = rows.iter().map(|&(name, kcal, p, c, f, fib, category)| {
            (
                name.to_owned(),
                DatasetEntry {
                    calories_per_100g: kcal,
                    protein_g: p,
                    carbs_g: c,
                    fat_g: f,
                    fiber_g: fib,
                    category,
                },
            )
        });
        Self::from_entries(entries)
    }

    /// Look up a food by name, tolerant of case and separator variations
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&DatasetEntry> {
        self.entries.get(&normalize_name(name))
    }

    /// Number of known foods
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset holds no foods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
