// ABOUTME: Feature extraction: food descriptor to fixed-width numeric vector
// ABOUTME: Keyword-table ingredient, preparation, and semantic analysis; 13/41 modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Feature extraction for model inference.
//!
//! The domain vocabulary is small and closed, so matching is plain
//! case-insensitive substring lookup against keyword tables rather than any
//! NLP machinery. Extraction never fails: unknown or missing inputs degrade
//! to zero features so novel foods still get a prediction.
//!
//! Vector layout (enhanced mode, 41 features):
//! 5 basic + 10 preparation one-hot + 10 ingredient + 8 semantic +
//! 8 category one-hot. Legacy mode keeps only the 5 basic + 8 category
//! features (13). The mode is always introspected from the loaded model's
//! expected width, never configured independently.

use crate::dataset::normalize_name;
use crate::models::{
    FoodCategory, FoodDescriptor, PreparationMethod, CATEGORY_ONE_HOT_ORDER,
    PREPARATION_ONE_HOT_ORDER,
};
use serde::{Deserialize, Serialize};

/// Width of the legacy feature layout
pub const LEGACY_WIDTH: usize = 13;
/// Width of the enhanced feature layout
pub const ENHANCED_WIDTH: usize = 41;

/// Feature layout mode, selected from the loaded model's input width
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureMode {
    /// 13 features: basic + category one-hot
    Legacy,
    /// 41 features: basic + preparation + ingredients + semantics + category
    Enhanced,
}

impl FeatureMode {
    /// Select the mode matching a model's expected input width
    #[must_use]
    pub const fn from_width(width: usize) -> Option<Self> {
        match width {
            LEGACY_WIDTH => Some(Self::Legacy),
            ENHANCED_WIDTH => Some(Self::Enhanced),
            _ => None,
        }
    }

    /// Vector width this mode produces
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Legacy => LEGACY_WIDTH,
            Self::Enhanced => ENHANCED_WIDTH,
        }
    }
}

/// Fixed-length ordered numeric encoding of one food descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    /// Layout mode the vector was built under
    pub mode: FeatureMode,
    /// Feature values in layout order
    pub values: Vec<f64>,
}

/// Ingredient keyword hits grouped by food class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngredientSignals {
    /// Meat/poultry/seafood keyword hits
    pub meat_count: u32,
    /// Vegetable keyword hits
    pub vegetable_count: u32,
    /// Grain keyword hits
    pub grain_count: u32,
    /// Dairy keyword hits
    pub dairy_count: u32,
    /// Legume keyword hits
    pub legume_count: u32,
}

impl IngredientSignals {
    /// Whether any meat keyword matched
    #[must_use]
    pub const fn has_meat(&self) -> bool {
        self.meat_count > 0
    }
}

/// Semantic flags parsed from a food name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemanticSignals {
    /// Name matches a regional cuisine keyword
    pub regional_cuisine: bool,
    /// Western fast-food/continental keyword
    pub western_cuisine: bool,
    /// Spicy descriptor
    pub spicy: bool,
    /// Sweet/dessert descriptor
    pub sweet: bool,
    /// Creamy descriptor
    pub creamy: bool,
    /// Sour descriptor
    pub sour: bool,
    /// Salty/savory-cured descriptor
    pub salty: bool,
    /// Word count of the normalized name
    pub word_count: u32,
}

/// Meat, poultry, and seafood keywords
const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "pork", "beef", "fish", "shrimp", "hipon", "bangus", "tilapia", "galunggong",
    "liver", "ham", "bacon", "sisig", "lechon", "longganisa", "tocino", "tapa", "squid", "pusit",
    "crab", "alimango", "karne", "manok", "baboy", "baka",
];

/// Vegetable keywords
const VEGETABLE_KEYWORDS: &[&str] = &[
    "kangkong", "talong", "eggplant", "spinach", "okra", "kalabasa", "squash", "sitaw",
    "ampalaya", "cabbage", "repolyo", "carrot", "pechay", "malunggay", "tomato", "kamatis",
    "gulay", "upo", "sayote",
];

/// Grain and starch keywords
const GRAIN_KEYWORDS: &[&str] = &[
    "rice", "kanin", "bihon", "noodle", "pancit", "bread", "pandesal", "pasta", "mami",
    "sotanghon", "oat", "corn", "mais", "lugaw", "arroz",
];

/// Dairy keywords
const DAIRY_KEYWORDS: &[&str] = &["milk", "gatas", "cheese", "keso", "kesong", "yogurt", "butter", "cream"];

/// Legume keywords
const LEGUME_KEYWORDS: &[&str] = &[
    "tofu", "tokwa", "monggo", "mung", "bean", "lentil", "peanut", "mani", "chickpea", "garbanzo",
];

/// Fried keywords, shared by preparation detection and the `healthy`
/// filter's fried clause so the two notions of "fried" cannot drift
const FRIED_KEYWORDS: &[&str] = &[
    "fried", "prito", "pritong", "crispy", "kawali", "lumpia", "chicharon", "tempura", "katsu",
];

/// Preparation keyword tables, checked in this order; first hit wins.
/// Domain synonyms are included so a braised-style dish name like "adobo"
/// resolves without the literal word "braised".
const PREPARATION_KEYWORDS: &[(PreparationMethod, &[&str])] = &[
    (PreparationMethod::Fried, FRIED_KEYWORDS),
    (
        PreparationMethod::Grilled,
        &["grilled", "inihaw", "ihaw", "barbecue", "bbq", "inasal", "sugba"],
    ),
    (
        PreparationMethod::Braised,
        &["braised", "adobo", "kaldereta", "mechado", "afritada", "humba", "asado", "estofado", "stew"],
    ),
    (
        PreparationMethod::Boiled,
        &["boiled", "nilaga", "sinigang", "tinola", "bulalo", "pesa"],
    ),
    (
        PreparationMethod::Steamed,
        &["steamed", "siomai", "siopao", "puto", "halabos"],
    ),
    (PreparationMethod::Baked, &["baked", "bibingka", "ensaymada"]),
    (PreparationMethod::Roasted, &["roasted", "roast", "litson"]),
    (
        PreparationMethod::Sauteed,
        &["sauteed", "ginisa", "ginisang", "guisado", "stir fry", "stir fried"],
    ),
    (PreparationMethod::Smoked, &["smoked", "tinapa"]),
    (
        PreparationMethod::Raw,
        &["raw", "fresh", "kinilaw", "kilawin", "ensalada", "salad", "sashimi"],
    ),
];

/// Regional cuisine keywords (Filipino dishes dominate the app's users)
const REGIONAL_KEYWORDS: &[&str] = &[
    "adobo", "sinigang", "pancit", "lechon", "kare", "sisig", "tinola", "lumpia", "bicol",
    "laing", "dinuguan", "pinakbet", "halo", "bibingka", "longganisa",
];

/// Western fast-food and continental keywords
const WESTERN_KEYWORDS: &[&str] = &[
    "burger", "pizza", "pasta", "sandwich", "steak", "fries", "hotdog", "spaghetti",
];

const SPICY_KEYWORDS: &[&str] = &["spicy", "sili", "chili", "hot sauce", "bicol express"];
const SWEET_KEYWORDS: &[&str] = &[
    "sweet", "candy", "cake", "dessert", "halo halo", "leche flan", "sugar", "chocolate", "turon",
];
const CREAMY_KEYWORDS: &[&str] = &["creamy", "cream", "carbonara", "gata", "coconut milk"];
const SOUR_KEYWORDS: &[&str] = &["sour", "sinigang", "kinilaw", "paksiw", "vinegar", "calamansi"];
const SALTY_KEYWORDS: &[&str] = &["salty", "salted", "bagoong", "patis", "soy", "toyo", "daing"];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

fn count_matches(haystack: &str, keywords: &[&str]) -> u32 {
    keywords.iter().filter(|kw| haystack.contains(*kw)).count() as u32
}

/// Stateless feature extractor over the keyword tables above
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create an extractor
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Count ingredient-class keyword hits in a food's name and ingredient
    /// list. Multiple matches accumulate; matching is case-insensitive
    /// substring lookup.
    #[must_use]
    pub fn extract_ingredients(
        &self,
        name: &str,
        ingredients: Option<&[String]>,
    ) -> IngredientSignals {
        let mut text = normalize_name(name);
        if let Some(items) = ingredients {
            for item in items {
                text.push(' ');
                text.push_str(&normalize_name(item));
            }
        }
        IngredientSignals {
            meat_count: count_matches(&text, MEAT_KEYWORDS),
            vegetable_count: count_matches(&text, VEGETABLE_KEYWORDS),
            grain_count: count_matches(&text, GRAIN_KEYWORDS),
            dairy_count: count_matches(&text, DAIRY_KEYWORDS),
            legume_count: count_matches(&text, LEGUME_KEYWORDS),
        }
    }

    /// Detect a preparation method from a food name, `None` when nothing
    /// matches
    #[must_use]
    pub fn detect_preparation(&self, name: &str) -> Option<PreparationMethod> {
        let normalized = normalize_name(name);
        PREPARATION_KEYWORDS
            .iter()
            .find(|(_, keywords)| contains_any(&normalized, keywords))
            .map(|&(method, _)| method)
    }

    /// Parse cuisine, descriptor, and word-count signals from a food name
    #[must_use]
    pub fn analyze_semantics(&self, name: &str) -> SemanticSignals {
        let normalized = normalize_name(name);
        SemanticSignals {
            regional_cuisine: contains_any(&normalized, REGIONAL_KEYWORDS),
            western_cuisine: contains_any(&normalized, WESTERN_KEYWORDS),
            spicy: contains_any(&normalized, SPICY_KEYWORDS),
            sweet: contains_any(&normalized, SWEET_KEYWORDS),
            creamy: contains_any(&normalized, CREAMY_KEYWORDS),
            sour: contains_any(&normalized, SOUR_KEYWORDS),
            salty: contains_any(&normalized, SALTY_KEYWORDS),
            word_count: normalized.split(' ').filter(|w| !w.is_empty()).count() as u32,
        }
    }

    /// Resolve the effective preparation: explicit descriptor field first,
    /// then keyword detection
    #[must_use]
    pub fn effective_preparation(&self, descriptor: &FoodDescriptor) -> Option<PreparationMethod> {
        descriptor
            .preparation
            .or_else(|| self.detect_preparation(&descriptor.name))
    }

    /// Build the feature vector for a descriptor in the given mode.
    ///
    /// Never fails: missing or unknown inputs produce zero/default features.
    #[must_use]
    pub fn prepare_features(&self, descriptor: &FoodDescriptor, mode: FeatureMode) -> FeatureVector {
        let mut values = Vec::with_capacity(mode.width());
        let preparation = self.effective_preparation(descriptor);
        let ingredient_count = descriptor.ingredients.as_ref().map_or(0, Vec::len);

        // Basic features (5)
        values.push(descriptor.name.chars().count() as f64);
        values.push(descriptor.serving_size_grams.max(0.0));
        values.push(f64::from(u8::from(descriptor.category != FoodCategory::Unknown)));
        values.push(f64::from(u8::from(preparation.is_some())));
        values.push(ingredient_count as f64);

        if mode == FeatureMode::Enhanced {
            // Preparation one-hot (10)
            let prep_index = preparation.map(PreparationMethod::one_hot_index);
            for (i, _) in PREPARATION_ONE_HOT_ORDER.iter().enumerate() {
                values.push(f64::from(u8::from(prep_index == Some(i))));
            }

            // Ingredient features (10): five class counts, five presence flags
            let signals =
                self.extract_ingredients(&descriptor.name, descriptor.ingredients.as_deref());
            let counts = [
                signals.meat_count,
                signals.vegetable_count,
                signals.grain_count,
                signals.dairy_count,
                signals.legume_count,
            ];
            for count in counts {
                values.push(f64::from(count));
            }
            for count in counts {
                values.push(f64::from(u8::from(count > 0)));
            }

            // Semantic features (8)
            let semantics = self.analyze_semantics(&descriptor.name);
            values.push(f64::from(u8::from(semantics.regional_cuisine)));
            values.push(f64::from(u8::from(semantics.western_cuisine)));
            values.push(f64::from(u8::from(semantics.spicy)));
            values.push(f64::from(u8::from(semantics.sweet)));
            values.push(f64::from(u8::from(semantics.creamy)));
            values.push(f64::from(u8::from(semantics.sour)));
            values.push(f64::from(u8::from(semantics.salty)));
            values.push(f64::from(semantics.word_count));
        }

        // Category one-hot (8), mutually exclusive, all zero for Unknown
        let cat_index = descriptor.category.one_hot_index();
        for (i, _) in CATEGORY_ONE_HOT_ORDER.iter().enumerate() {
            values.push(f64::from(u8::from(cat_index == Some(i))));
        }

        debug_assert_eq!(values.len(), mode.width());
        FeatureVector { mode, values }
    }

    /// Whether a food name matches a fried-food keyword (used by the
    /// `healthy` hard filter). Same table as `Fried` preparation detection.
    #[must_use]
    pub fn matches_fried_keyword(&self, name: &str) -> bool {
        contains_any(&normalize_name(name), FRIED_KEYWORDS)
    }

    /// Whether a food name matches a meat/seafood keyword (used by the
    /// `plant_based` hard filter)
    #[must_use]
    pub fn matches_meat_keyword(&self, name: &str) -> bool {
        contains_any(&normalize_name(name), MEAT_KEYWORDS)
    }
}
