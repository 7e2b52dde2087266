//! Gradient-boosted regression stumps on lagged features.
//!
//! Each training sample is one day, described by the previous seven
//! values, their mean and the weekday. Stumps are fitted greedily to the
//! residuals of the running ensemble; multi-step forecasts feed each
//! prediction back in as the next day's lag-1.

use crate::core::{DailySeries, Forecast};
use crate::error::{AnalysisError, Result};
use crate::models::Forecaster;
use crate::utils::stats::mean;
use chrono::{Datelike, Duration, NaiveDate};

/// Number of lag features.
const LAGS: usize = 7;
/// Lags plus rolling mean plus weekday.
const FEATURES: usize = LAGS + 2;

/// A depth-one regression tree.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stump {
    feature: usize,
    threshold: f64,
    left: f64,
    right: f64,
}

impl Stump {
    fn predict(&self, x: &[f64; FEATURES]) -> f64 {
        if x[self.feature] <= self.threshold {
            self.left
        } else {
            self.right
        }
    }
}

/// Gradient boosting on lag features.
///
/// Needs at least seven training samples, that is fourteen days of history.
#[derive(Debug, Clone)]
pub struct BoostedLags {
    rounds: usize,
    learning_rate: f64,
    max_thresholds: usize,
    base: f64,
    stumps: Vec<Stump>,
    history: Vec<f64>,
    last_date: Option<NaiveDate>,
}

impl BoostedLags {
    /// Create a model with 60 rounds at learning rate 0.1.
    pub fn new() -> Self {
        Self {
            rounds: 60,
            learning_rate: 0.1,
            max_thresholds: 16,
            base: 0.0,
            stumps: Vec::new(),
            history: Vec::new(),
            last_date: None,
        }
    }

    /// Set the number of boosting rounds.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    /// Set the shrinkage applied to each stump.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate.clamp(1e-4, 1.0);
        self
    }

    /// Number of stumps kept after fitting.
    pub fn stump_count(&self) -> usize {
        self.stumps.len()
    }

    fn score(&self, x: &[f64; FEATURES]) -> f64 {
        self.base
            + self.learning_rate * self.stumps.iter().map(|s| s.predict(x)).sum::<f64>()
    }

    /// Best split of `residuals` over all features, if any reduces the error.
    fn best_stump(&self, features: &[[f64; FEATURES]], residuals: &[f64]) -> Option<Stump> {
        let n = residuals.len() as f64;
        let total: f64 = residuals.iter().sum();
        let mut best: Option<(f64, Stump)> = None;

        for feature in 0..FEATURES {
            for threshold in candidate_thresholds(features, feature, self.max_thresholds) {
                let mut left_sum = 0.0;
                let mut left_n = 0usize;
                for (x, r) in features.iter().zip(residuals) {
                    if x[feature] <= threshold {
                        left_sum += r;
                        left_n += 1;
                    }
                }
                let right_n = residuals.len() - left_n;
                if left_n == 0 || right_n == 0 {
                    continue;
                }
                let right_sum = total - left_sum;
                // Reduction in squared error relative to a single leaf.
                let gain = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64
                    - total * total / n;
                if gain <= 1e-12 {
                    continue;
                }
                let stump = Stump {
                    feature,
                    threshold,
                    left: left_sum / left_n as f64,
                    right: right_sum / right_n as f64,
                };
                match best {
                    Some((best_gain, _)) if gain <= best_gain => {}
                    _ => best = Some((gain, stump)),
                }
            }
        }
        best.map(|(_, stump)| stump)
    }
}

impl Default for BoostedLags {
    fn default() -> Self {
        Self::new()
    }
}

/// Feature vector for the day following `window` (the last `LAGS` values).
fn features_for(window: &[f64], date: NaiveDate) -> [f64; FEATURES] {
    let mut x = [0.0; FEATURES];
    for lag in 1..=LAGS {
        x[lag - 1] = window[window.len() - lag];
    }
    x[LAGS] = mean(&window[window.len() - LAGS..]);
    x[LAGS + 1] = date.weekday().num_days_from_monday() as f64;
    x
}

/// Up to `max` evenly spaced split points between distinct sorted values.
fn candidate_thresholds(features: &[[f64; FEATURES]], feature: usize, max: usize) -> Vec<f64> {
    let mut values: Vec<f64> = features.iter().map(|x| x[feature]).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    if values.len() < 2 {
        return Vec::new();
    }

    let midpoints: Vec<f64> = values.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
    if midpoints.len() <= max {
        return midpoints;
    }
    let step = midpoints.len() as f64 / max as f64;
    (0..max)
        .map(|i| midpoints[(i as f64 * step) as usize])
        .collect()
}

impl Forecaster for BoostedLags {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        let values = series.values();
        let samples = values.len().saturating_sub(LAGS);
        if samples < LAGS {
            return Err(AnalysisError::InsufficientData {
                needed: 2 * LAGS,
                got: values.len(),
            });
        }

        let dates = series.dates();
        let features: Vec<[f64; FEATURES]> = (LAGS..values.len())
            .map(|t| features_for(&values[t - LAGS..t], dates[t]))
            .collect();
        let targets = &values[LAGS..];

        self.base = mean(targets);
        self.stumps.clear();
        let mut predictions = vec![self.base; targets.len()];

        for _ in 0..self.rounds {
            let residuals: Vec<f64> = targets
                .iter()
                .zip(&predictions)
                .map(|(y, p)| y - p)
                .collect();
            let stump = match self.best_stump(&features, &residuals) {
                Some(stump) => stump,
                None => break,
            };
            for (p, x) in predictions.iter_mut().zip(&features) {
                *p += self.learning_rate * stump.predict(x);
            }
            self.stumps.push(stump);
        }

        self.history = values.to_vec();
        self.last_date = series.last_date();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let last_date = self
            .last_date
            .ok_or_else(|| AnalysisError::ComputationError("model not fitted".to_string()))?;

        let mut window: Vec<f64> = self.history[self.history.len() - LAGS..].to_vec();
        let mut point = Vec::with_capacity(horizon);
        for h in 1..=horizon {
            let date = last_date + Duration::days(h as i64);
            let x = features_for(&window[window.len() - LAGS..], date);
            let prediction = self.score(&x);
            point.push(prediction);
            window.push(prediction);
        }

        let forecast = Forecast::from_values(point);
        forecast.ensure_finite()?;
        Ok(forecast)
    }

    fn name(&self) -> &str {
        "BoostedLags"
    }
}
