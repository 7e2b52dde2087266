//! Holdout evaluation of candidate models.
//!
//! The final `K` days are withheld, every candidate is fitted on the rest
//! and scored against them, then refitted on the full history for the
//! actual forecast.

use crate::core::DailySeries;
use crate::error::{AnalysisError, Result};
use crate::models::ModelSpec;
use crate::utils::metrics::mae;
use crate::utils::{calculate_metrics, AccuracyMetrics};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of days to withhold from a series of `len` days.
///
/// At most `holdout_days`, and never so many that fewer than
/// `min_training_days` remain.
pub fn holdout_size(len: usize, holdout_days: usize, min_training_days: usize) -> usize {
    holdout_days.min(len.saturating_sub(min_training_days))
}

/// Withheld actuals with the ensemble's predictions for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldoutWindow {
    pub dates: Vec<NaiveDate>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

impl HoldoutWindow {
    /// Number of evaluated days.
    pub fn samples(&self) -> usize {
        self.actual.len()
    }

    /// Accuracy of the predictions against the actuals.
    pub fn score(&self) -> Result<AccuracyMetrics> {
        calculate_metrics(&self.actual, &self.predicted)
    }

    /// Mean magnitude of the actuals, the scale for normalised error.
    pub fn mean_abs_actual(&self) -> f64 {
        if self.actual.is_empty() {
            return 0.0;
        }
        self.actual.iter().map(|v| v.abs()).sum::<f64>() / self.actual.len() as f64
    }
}

/// Predictions of one candidate that survived evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRun {
    pub name: String,
    /// Predictions for the withheld days.
    pub holdout: Vec<f64>,
    /// Predictions for the forecast horizon.
    pub future: Vec<f64>,
    /// Mean absolute error on the withheld days.
    pub holdout_mae: f64,
}

/// Fit `spec` on `train`, score it on `test`, then refit on `full`.
///
/// Any failure is reported as [`AnalysisError::ModelFailure`] naming the
/// model, so the caller can exclude it and continue.
pub fn evaluate_candidate(
    spec: &ModelSpec,
    train: &DailySeries,
    test: &DailySeries,
    full: &DailySeries,
    horizon: usize,
) -> Result<CandidateRun> {
    let failure = |err: AnalysisError| AnalysisError::ModelFailure {
        model: spec.name.to_string(),
        reason: err.to_string(),
    };

    let mut model = spec.create();
    model.fit(train).map_err(failure)?;
    let holdout = model.predict(test.len()).map_err(failure)?;
    holdout.ensure_finite().map_err(failure)?;
    let holdout_mae = mae(test.values(), holdout.point());
    if !holdout_mae.is_finite() {
        return Err(failure(AnalysisError::ComputationError(
            "holdout error is not finite".to_string(),
        )));
    }

    let mut model = spec.create();
    model.fit(full).map_err(failure)?;
    let future = model.predict(horizon).map_err(failure)?;
    future.ensure_finite().map_err(failure)?;

    Ok(CandidateRun {
        name: spec.name.to_string(),
        holdout: holdout.point().to_vec(),
        future: future.point().to_vec(),
        holdout_mae,
    })
}
