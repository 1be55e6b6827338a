// ABOUTME: Append-only usage observability for every prediction the engine makes
// ABOUTME: In-memory counters plus optional line-delimited JSON log persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kusina

//! Usage monitor.
//!
//! Cross-cutting observability: one immutable entry per prediction, appended
//! to a monotonic log. A failed append must never reach the prediction
//! caller; it is logged and swallowed. Statistics readers tolerate
//! eventually-consistent counts, so a single lightweight mutex suffices.

use crate::errors::{AppError, AppResult};
use crate::models::{FoodCategory, PredictionMethod, UsageLogEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// Aggregated view over everything the monitor has recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStatistics {
    /// Total predictions recorded
    pub total_predictions: u64,
    /// Prediction counts per method
    pub by_method: HashMap<PredictionMethod, u64>,
    /// Prediction counts per category
    pub by_category: HashMap<FoodCategory, u64>,
    /// Per-method share of total, 0..100
    pub method_percentages: HashMap<PredictionMethod, f64>,
    /// Running mean of prediction confidence
    pub average_confidence: f64,
}

#[derive(Debug, Default)]
struct MonitorState {
    total: u64,
    by_method: HashMap<PredictionMethod, u64>,
    by_category: HashMap<FoodCategory, u64>,
    confidence_sum: f64,
    writer: Option<File>,
}

impl MonitorState {
    fn count(&mut self, entry: &UsageLogEntry) {
        self.total += 1;
        *self.by_method.entry(entry.method).or_insert(0) += 1;
        *self.by_category.entry(entry.category).or_insert(0) += 1;
        self.confidence_sum += entry.confidence;
    }
}

/// Append-only prediction usage monitor
#[derive(Debug, Default)]
pub struct UsageMonitor {
    state: Mutex<MonitorState>,
}

impl UsageMonitor {
    /// In-memory monitor without log persistence
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor appending entries to a JSONL file, replaying any entries the
    /// file already holds so counters survive restarts. Corrupt lines are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the file cannot be opened for append.
    pub fn with_log_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mut state = MonitorState::default();

        if path.exists() {
            let reader = BufReader::new(File::open(path).map_err(|e| {
                AppError::storage_error(format!("failed to open usage log {}", path.display()))
                    .with_source(e)
            })?);
            let mut skipped = 0_u64;
            for line in reader.lines() {
                let Ok(line) = line else {
                    skipped += 1;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<UsageLogEntry>(&line) {
                    Ok(entry) => state.count(&entry),
                    Err(_) => skipped += 1,
                }
            }
            if skipped > 0 {
                warn!(skipped, path = %path.display(), "skipped corrupt usage log lines");
            }
            info!(replayed = state.total, path = %path.display(), "usage log replayed");
        }

        state.writer = Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::storage_error(format!(
                        "failed to open usage log {} for append",
                        path.display()
                    ))
                    .with_source(e)
                })?,
        );

        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Record one prediction. Never fails: counter and log problems are
    /// warned about and swallowed so the prediction caller is unaffected.
    pub fn record(&self, entry: &UsageLogEntry) {
        let Ok(mut state) = self.state.lock() else {
            warn!("usage monitor lock poisoned; entry dropped");
            return;
        };
        state.count(entry);
        if let Some(writer) = state.writer.as_mut() {
            let append = serde_json::to_string(entry)
                .map_err(AppError::from)
                .and_then(|line| writeln!(writer, "{line}").map_err(AppError::from));
            if let Err(err) = append {
                warn!(error = %err, "usage log append failed; entry counted in memory only");
            }
        }
    }

    /// Snapshot of aggregate statistics
    #[must_use]
    pub fn statistics(&self) -> UsageStatistics {
        let Ok(state) = self.state.lock() else {
            warn!("usage monitor lock poisoned; returning empty statistics");
            return UsageStatistics {
                total_predictions: 0,
                by_method: HashMap::new(),
                by_category: HashMap::new(),
                method_percentages: HashMap::new(),
                average_confidence: 0.0,
            };
        };
        let total = state.total;
        let method_percentages = state
            .by_method
            .iter()
            .map(|(&method, &count)| {
                let pct = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                (method, pct)
            })
            .collect();
        UsageStatistics {
            total_predictions: total,
            by_method: state.by_method.clone(),
            by_category: state.by_category.clone(),
            method_percentages,
            average_confidence: if total == 0 {
                0.0
            } else {
                state.confidence_sum / total as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictionResult;

    fn entry(method: PredictionMethod, confidence: f64) -> UsageLogEntry {
        UsageLogEntry::from_prediction(
            "test food",
            &PredictionResult {
                calories_per_100g: 100.0,
                total_calories: 150.0,
                method,
                confidence,
                category: FoodCategory::Grains,
            },
        )
    }

    #[test]
    fn totals_equal_sum_of_method_counts() {
        let monitor = UsageMonitor::new();
        monitor.record(&entry(PredictionMethod::DatabaseLookup, 0.95));
        monitor.record(&entry(PredictionMethod::DatabaseLookup, 0.95));
        monitor.record(&entry(PredictionMethod::RuleBased, 0.70));
        monitor.record(&entry(PredictionMethod::Blended, 0.65));

        let stats = monitor.statistics();
        assert_eq!(stats.total_predictions, 4);
        let method_sum: u64 = stats.by_method.values().sum();
        assert_eq!(method_sum, stats.total_predictions);
        assert_eq!(stats.by_method[&PredictionMethod::DatabaseLookup], 2);
    }

    #[test]
    fn percentages_and_mean_confidence() {
        let monitor = UsageMonitor::new();
        monitor.record(&entry(PredictionMethod::MlModel, 0.85));
        monitor.record(&entry(PredictionMethod::RuleBased, 0.65));

        let stats = monitor.statistics();
        assert!((stats.method_percentages[&PredictionMethod::MlModel] - 50.0).abs() < 1e-9);
        assert!((stats.average_confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_monitor_reports_zeros() {
        let stats = UsageMonitor::new().statistics();
        assert_eq!(stats.total_predictions, 0);
        assert!(stats.average_confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn entries_persist_as_jsonl_and_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");

        {
            let monitor = UsageMonitor::with_log_file(&path).unwrap();
            monitor.record(&entry(PredictionMethod::DatabaseLookup, 0.95));
            monitor.record(&entry(PredictionMethod::RuleBased, 0.70));
        }

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        for line in raw.lines() {
            let parsed: UsageLogEntry = serde_json::from_str(line).unwrap();
            assert_eq!(parsed.food_name, "test food");
        }

        let reopened = UsageMonitor::with_log_file(&path).unwrap();
        assert_eq!(reopened.statistics().total_predictions, 2);
    }

    #[test]
    fn corrupt_lines_are_skipped_on_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");
        let good = serde_json::to_string(&entry(PredictionMethod::Blended, 0.7)).unwrap();
        std::fs::write(&path, format!("{good}\nnot json\n\n{good}\n")).unwrap();

        let monitor = UsageMonitor::with_log_file(&path).unwrap();
        assert_eq!(monitor.statistics().total_predictions, 2);
    }
}
