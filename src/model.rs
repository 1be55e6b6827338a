// ABOUTME: Trained calorie model surface: CalorieModel trait plus JSON-artifact loader
// ABOUTME: Exposes input width introspection so the extractor always matches the model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Trained regression model interface.
//!
//! Training happens offline; this module only loads and evaluates the
//! exported artifact. The artifact's expected input width (13 legacy or 41
//! enhanced) is introspectable and is the single source of truth for which
//! feature mode the extractor runs in.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A trained model that maps a feature vector to a calorie density estimate
/// (kcal per 100 g)
pub trait CalorieModel: Send + Sync {
    /// Evaluate the model on a prepared feature vector
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the vector width does not match
    /// [`CalorieModel::input_width`].
    fn predict(&self, features: &[f64]) -> AppResult<f64>;

    /// Feature vector width this model expects (13 or 41)
    fn input_width(&self) -> usize;
}

/// Serialized linear regression artifact: standardization parameters plus
/// coefficients, exported by the offline training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearCalorieModel {
    /// Per-feature means used for standardization
    pub feature_means: Vec<f64>,
    /// Per-feature standard deviations used for standardization
    pub feature_stds: Vec<f64>,
    /// Regression coefficients over standardized features
    pub weights: Vec<f64>,
    /// Regression intercept
    pub intercept: f64,
}

impl LinearCalorieModel {
    /// Load a model artifact from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` when the file is unreadable, not valid
    /// JSON, or internally inconsistent. Callers treat this as a degraded
    /// start, not a fatal one.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::model_unavailable(format!("failed to read model {}", path.display()))
                .with_source(e)
        })?;
        let model: Self = serde_json::from_str(&raw).map_err(|e| {
            AppError::model_unavailable(format!("invalid model JSON in {}", path.display()))
                .with_source(e)
        })?;
        model.validate()?;
        info!(
            input_width = model.input_width(),
            path = %path.display(),
            "calorie model loaded"
        );
        Ok(model)
    }

    /// Check internal consistency of the artifact
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` when parameter vector lengths disagree or
    /// a standard deviation is non-positive.
    pub fn validate(&self) -> AppResult<()> {
        let width = self.weights.len();
        if width == 0 {
            return Err(AppError::model_unavailable("model has no coefficients"));
        }
        if self.feature_means.len() != width || self.feature_stds.len() != width {
            return Err(AppError::model_unavailable(format!(
                "parameter length mismatch: {} weights, {} means, {} stds",
                width,
                self.feature_means.len(),
                self.feature_stds.len()
            )));
        }
        if self.feature_stds.iter().any(|&s| s <= 0.0) {
            return Err(AppError::model_unavailable(
                "non-positive feature standard deviation",
            ));
        }
        Ok(())
    }
}

impl CalorieModel for LinearCalorieModel {
    fn predict(&self, features: &[f64]) -> AppResult<f64> {
        if features.len() != self.input_width() {
            return Err(AppError::invalid_input(format!(
                "feature vector width {} does not match model width {}",
                features.len(),
                self.input_width()
            )));
        }
        let estimate = features
            .iter()
            .zip(&self.feature_means)
            .zip(&self.feature_stds)
            .zip(&self.weights)
            .map(|(((x, mean), std), w)| w * ((x - mean) / std))
            .sum::<f64>()
            + self.intercept;
        Ok(estimate)
    }

    fn input_width(&self) -> usize {
        self.weights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_model(width: usize) -> LinearCalorieModel {
        LinearCalorieModel {
            feature_means: vec![0.0; width],
            feature_stds: vec![1.0; width],
            weights: vec![1.0; width],
            intercept: 10.0,
        }
    }

    #[test]
    fn predict_is_standardized_dot_product() {
        let model = identity_model(3);
        let value = model.predict(&[1.0, 2.0, 3.0]).unwrap();
        assert!((value - 16.0).abs() < 1e-9);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let model = identity_model(13);
        assert!(model.predict(&[1.0; 41]).is_err());
    }

    #[test]
    fn inconsistent_artifact_fails_validation() {
        let mut model = identity_model(13);
        model.feature_stds.pop();
        assert!(model.validate().is_err());

        let mut model = identity_model(13);
        model.feature_stds[0] = 0.0;
        assert!(model.validate().is_err());
    }

    #[test]
    fn artifact_roundtrips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = identity_model(41);
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();
        let loaded = LinearCalorieModel::from_json_file(&path).unwrap();
        assert_eq!(loaded.input_width(), 41);
    }
}
