//! Forecast output records.

use crate::utils::AccuracyMetrics;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a forecast point relative to its recent predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

impl TrendDirection {
    /// Classify `value` against `reference` with a relative stability band.
    ///
    /// A zero reference is compared by sign alone.
    pub fn classify(value: f64, reference: f64, threshold: f64) -> Self {
        let change = if reference == 0.0 {
            value
        } else {
            (value - reference) / reference.abs()
        };
        if change > threshold {
            TrendDirection::Upward
        } else if change < -threshold {
            TrendDirection::Downward
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Upward => "upward",
            TrendDirection::Downward => "downward",
            TrendDirection::Stable => "stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of the ensemble forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_sales: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub upper_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
    pub trend: TrendDirection,
}

impl ForecastPoint {
    /// Width of the uncertainty interval, zero when bounds are absent.
    pub fn interval_width(&self) -> f64 {
        match (self.lower_bound, self.upper_bound) {
            (Some(lower), Some(upper)) => upper - lower,
            _ => 0.0,
        }
    }
}

/// Holdout accuracy of the ensemble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mape: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rmse: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub samples_evaluated: Option<usize>,
    /// `1 / (1 + e)` for normalised holdout error `e`, in `[0, 1]`.
    pub model_confidence: f64,
    /// `100 · (1 − e)` clamped to `[0, 100]`.
    pub prediction_accuracy: f64,
}

impl ForecastMetrics {
    /// Derive the reported metrics from holdout accuracy.
    ///
    /// `mean_abs_actual` normalises the RMSE; a zero scale with a non-zero
    /// error counts as unbounded error.
    pub fn from_accuracy(accuracy: &AccuracyMetrics, mean_abs_actual: f64) -> Self {
        let error = normalized_error(accuracy.rmse, mean_abs_actual);
        Self {
            mape: accuracy.mape,
            rmse: Some(accuracy.rmse),
            r_squared: Some(accuracy.r_squared),
            samples_evaluated: Some(accuracy.samples),
            model_confidence: (1.0 / (1.0 + error)).clamp(0.0, 1.0),
            prediction_accuracy: (100.0 * (1.0 - error)).clamp(0.0, 100.0),
        }
    }
}

fn normalized_error(rmse: f64, scale: f64) -> f64 {
    if !rmse.is_finite() {
        return f64::INFINITY;
    }
    if rmse == 0.0 {
        0.0
    } else if scale <= 0.0 {
        f64::INFINITY
    } else {
        rmse / scale
    }
}
