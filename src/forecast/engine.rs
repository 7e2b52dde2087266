//! Ensemble forecast engine.

use super::holdout::{evaluate_candidate, holdout_size, CandidateRun, HoldoutWindow};
use super::point::{ForecastMetrics, ForecastPoint, TrendDirection};
use crate::core::DailySeries;
use crate::error::{AnalysisError, Result};
use crate::models::{default_candidates, Ensemble, ModelRegistry, Weighting};
use crate::utils::stats::mean;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info, warn};

/// Parameters of the forecast engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of forecast days.
    pub horizon: usize,
    /// Shortest history that can be forecast.
    pub min_history: usize,
    /// Days withheld for accuracy evaluation.
    pub holdout_days: usize,
    /// Days that must remain for fitting after the holdout is withheld.
    pub min_training_days: usize,
    /// Coverage of the uncertainty bounds.
    pub confidence_level: f64,
    /// Relative widening of the bounds per horizon step.
    pub interval_widening: f64,
    /// Previous predictions a point is compared with for its trend label.
    pub trend_window: usize,
    /// Relative change below which a point is labelled stable.
    pub stability_threshold: f64,
    pub weighting: Weighting,
    /// Floor point predictions at zero.
    pub non_negative: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 90,
            min_history: 14,
            holdout_days: 14,
            min_training_days: 7,
            confidence_level: 0.95,
            interval_widening: 0.01,
            trend_window: 7,
            stability_threshold: 0.01,
            weighting: Weighting::InverseError,
            non_negative: true,
        }
    }
}

impl ForecastConfig {
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_holdout_days(mut self, days: usize) -> Self {
        self.holdout_days = days;
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(AnalysisError::InvalidParameter(
                "forecast horizon must be positive".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "confidence level {} must lie in (0, 1)",
                self.confidence_level
            )));
        }
        if self.holdout_days == 0 || self.min_training_days == 0 {
            return Err(AnalysisError::InvalidParameter(
                "holdout and training windows must be positive".to_string(),
            ));
        }
        if self.interval_widening < 0.0 {
            return Err(AnalysisError::InvalidParameter(
                "interval widening must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A candidate that was dropped from the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedModel {
    pub model: String,
    pub reason: String,
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub predictions: Vec<ForecastPoint>,
    pub metrics: ForecastMetrics,
    /// The evaluation window behind `metrics`.
    pub holdout: HoldoutWindow,
    pub models_used: Vec<String>,
    pub models_excluded: Vec<ExcludedModel>,
    /// Ensemble weight per entry of `models_used`.
    pub weights: Vec<f64>,
}

/// Runs the candidate models, evaluates them on a holdout window and
/// combines them into one forecast with widening uncertainty bounds.
#[derive(Debug)]
pub struct ForecastEngine {
    config: ForecastConfig,
    registry: ModelRegistry,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl ForecastEngine {
    /// Engine with the standard candidate set.
    pub fn new(config: ForecastConfig) -> Self {
        Self::with_registry(config, default_candidates())
    }

    /// Engine with a custom candidate set.
    pub fn with_registry(config: ForecastConfig, registry: ModelRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the days following `series`.
    ///
    /// Fails with [`AnalysisError::InsufficientHistory`] for short series and
    /// [`AnalysisError::ForecastUnavailable`] when every candidate fails.
    /// Individual candidate failures only exclude that candidate.
    pub fn forecast(&self, series: &DailySeries) -> Result<ForecastOutput> {
        self.config.validate()?;
        let cfg = &self.config;

        let n = series.len();
        let needed = cfg.min_history.max(cfg.min_training_days + 1);
        if n < needed {
            return Err(AnalysisError::InsufficientHistory { needed, got: n });
        }
        if self.registry.is_empty() {
            return Err(AnalysisError::ForecastUnavailable(
                "no candidate models registered".to_string(),
            ));
        }

        let k = holdout_size(n, cfg.holdout_days, cfg.min_training_days);
        let (train, test) = series.split_holdout(k)?;

        let results: Vec<Result<CandidateRun>> = self
            .registry
            .specs()
            .par_iter()
            .map(|spec| evaluate_candidate(spec, &train, &test, series, cfg.horizon))
            .collect();

        let mut runs = Vec::new();
        let mut excluded = Vec::new();
        for result in results {
            match result {
                Ok(run) => {
                    debug!(model = %run.name, mae = run.holdout_mae, "candidate evaluated");
                    runs.push(run);
                }
                Err(AnalysisError::ModelFailure { model, reason }) => {
                    warn!(%model, %reason, "excluding candidate model");
                    excluded.push(ExcludedModel { model, reason });
                }
                Err(other) => return Err(other),
            }
        }
        if runs.is_empty() {
            let reasons: Vec<String> = excluded
                .iter()
                .map(|e| format!("{}: {}", e.model, e.reason))
                .collect();
            return Err(AnalysisError::ForecastUnavailable(reasons.join("; ")));
        }

        let ensemble = Ensemble::new(cfg.weighting);
        let errors: Vec<f64> = runs.iter().map(|r| r.holdout_mae).collect();
        let weights = ensemble.weights(&errors)?;

        let holdout_members: Vec<Vec<f64>> = runs.iter().map(|r| r.holdout.clone()).collect();
        let holdout = HoldoutWindow {
            dates: test.dates().to_vec(),
            actual: test.values().to_vec(),
            predicted: self.floor(ensemble.combine(&holdout_members, &weights)?),
        };
        let accuracy = holdout.score()?;
        let metrics = ForecastMetrics::from_accuracy(&accuracy, holdout.mean_abs_actual());
        info!(
            samples = holdout.samples(),
            rmse = accuracy.rmse,
            accuracy = metrics.prediction_accuracy,
            models = runs.len(),
            "holdout evaluation complete"
        );

        let members: Vec<Vec<f64>> = runs.iter().map(|r| r.future.clone()).collect();
        let point = self.floor(ensemble.combine(&members, &weights)?);
        let dispersion = ensemble.dispersion(&members, &weights)?;
        let half_widths = self.half_widths(&dispersion, accuracy.rmse)?;
        let trends = self.trend_labels(series.values(), &point);

        let predictions = series
            .future_dates(cfg.horizon)
            .into_iter()
            .zip(point)
            .zip(half_widths)
            .zip(trends)
            .enumerate()
            .map(|(i, (((date, value), half), trend))| ForecastPoint {
                date,
                predicted_sales: value,
                lower_bound: Some(value - half),
                upper_bound: Some(value + half),
                confidence: Some(self.point_confidence(metrics.model_confidence, i)),
                trend,
            })
            .collect();

        Ok(ForecastOutput {
            predictions,
            metrics,
            holdout,
            models_used: runs.iter().map(|r| r.name.clone()).collect(),
            models_excluded: excluded,
            weights,
        })
    }

    fn floor(&self, values: Vec<f64>) -> Vec<f64> {
        if self.config.non_negative {
            values.into_iter().map(|v| v.max(0.0)).collect()
        } else {
            values
        }
    }

    /// Half widths that never shrink with the horizon.
    ///
    /// `σ_h = sqrt(dispersion_h² + rmse²)`, carried forward as a running
    /// maximum and widened by `1 + widening · (h − 1)`.
    fn half_widths(&self, dispersion: &[f64], rmse: f64) -> Result<Vec<f64>> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| AnalysisError::ComputationError(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.config.confidence_level / 2.0);

        let mut running = 0.0_f64;
        Ok(dispersion
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let sigma = (d * d + rmse * rmse).sqrt();
                running = running.max(sigma);
                z * running * (1.0 + self.config.interval_widening * i as f64)
            })
            .collect())
    }

    /// Label each point against the mean of the preceding window, which is
    /// seeded with the end of the history.
    fn trend_labels(&self, history: &[f64], point: &[f64]) -> Vec<TrendDirection> {
        let window = self.config.trend_window.max(1);
        let seed = &history[history.len().saturating_sub(window)..];
        let mut trail: Vec<f64> = seed.to_vec();

        point
            .iter()
            .map(|&value| {
                let reference = mean(&trail[trail.len().saturating_sub(window)..]);
                trail.push(value);
                TrendDirection::classify(value, reference, self.config.stability_threshold)
            })
            .collect()
    }

    fn point_confidence(&self, model_confidence: f64, step: usize) -> f64 {
        let decay = 1.0 - 0.5 * step as f64 / self.config.horizon as f64;
        (model_confidence * decay).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Forecast, GapFill};
    use crate::models::{Forecaster, ModelSpec, RecentAverage};
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn series(values: Vec<f64>) -> DailySeries {
        DailySeries::from_values(start(), values).unwrap()
    }

    /// A model that always fails to fit.
    struct Broken;

    impl Forecaster for Broken {
        fn fit(&mut self, _series: &DailySeries) -> Result<()> {
            Err(AnalysisError::ComputationError("broken".to_string()))
        }
        fn predict(&self, _horizon: usize) -> Result<Forecast> {
            Err(AnalysisError::ComputationError("broken".to_string()))
        }
        fn name(&self) -> &str {
            "Broken"
        }
    }

    #[test]
    fn constant_series_forecast() {
        let output = ForecastEngine::default().forecast(&series(vec![100.0; 60])).unwrap();

        assert_eq!(output.predictions.len(), 90);
        assert_eq!(output.models_used.len(), 4);
        for p in &output.predictions {
            assert_relative_eq!(p.predicted_sales, 100.0, epsilon = 1e-6);
            assert!(p.interval_width() < 1e-6);
            assert_eq!(p.trend, TrendDirection::Stable);
        }
        assert_relative_eq!(output.metrics.prediction_accuracy, 100.0, epsilon = 1e-6);
        assert_eq!(output.metrics.samples_evaluated, Some(14));
    }

    #[test]
    fn dates_follow_history() {
        let s = series((0..30).map(|i| 50.0 + (i % 7) as f64).collect());
        let output = ForecastEngine::default().forecast(&s).unwrap();

        let last = s.last_date().unwrap();
        for (h, p) in output.predictions.iter().enumerate() {
            assert_eq!(p.date, last + Duration::days(h as i64 + 1));
        }
    }

    #[test]
    fn widths_never_shrink() {
        let values: Vec<f64> = (0..80)
            .map(|i| 200.0 + 3.0 * i as f64 + if i % 7 == 5 { 60.0 } else { 0.0 })
            .collect();
        let output = ForecastEngine::default().forecast(&series(values)).unwrap();

        let widths: Vec<f64> = output.predictions.iter().map(|p| p.interval_width()).collect();
        for pair in widths.windows(2) {
            assert!(pair[1] + 1e-9 >= pair[0]);
        }
        assert!(widths[0] > 0.0);
        let confidence: Vec<f64> = output.predictions.iter().filter_map(|p| p.confidence).collect();
        assert!(confidence[0] > confidence[89]);
    }

    #[test]
    fn short_history_is_rejected() {
        let err = ForecastEngine::default()
            .forecast(&series(vec![1.0; 10]))
            .unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientHistory { needed: 14, got: 10 });
        assert!(err.is_fatal());
    }

    #[test]
    fn fourteen_days_use_a_reduced_holdout() {
        let output = ForecastEngine::default()
            .forecast(&series((0..14).map(|i| 10.0 + i as f64).collect()))
            .unwrap();
        assert_eq!(output.metrics.samples_evaluated, Some(7));
        // Seven training days are too few for the lag model.
        assert!(output.models_excluded.iter().any(|e| e.model == "BoostedLags"));
        assert!(!output.models_used.contains(&"BoostedLags".to_string()));
    }

    #[test]
    fn failing_candidates_are_excluded() {
        let registry = ModelRegistry::new()
            .with(ModelSpec::new("Broken", || Box::new(Broken)))
            .with(ModelSpec::new("RecentAverage", || Box::new(RecentAverage::new())));
        let engine = ForecastEngine::with_registry(ForecastConfig::default(), registry);

        let output = engine.forecast(&series(vec![5.0; 30])).unwrap();
        assert_eq!(output.models_used, vec!["RecentAverage".to_string()]);
        assert_eq!(output.models_excluded[0].model, "Broken");
        assert_eq!(output.weights, vec![1.0]);
    }

    #[test]
    fn all_candidates_failing_is_unavailable() {
        let registry = ModelRegistry::new().with(ModelSpec::new("Broken", || Box::new(Broken)));
        let engine = ForecastEngine::with_registry(ForecastConfig::default(), registry);

        assert!(matches!(
            engine.forecast(&series(vec![5.0; 30])),
            Err(AnalysisError::ForecastUnavailable(_))
        ));
    }

    #[test]
    fn declining_series_is_floored_at_zero() {
        let values: Vec<f64> = (0..40).map(|i| 400.0 - 10.0 * i as f64).collect();
        let output = ForecastEngine::default().forecast(&series(values)).unwrap();

        assert!(output.predictions.iter().all(|p| p.predicted_sales >= 0.0));
        assert_eq!(output.predictions[0].trend, TrendDirection::Downward);
    }

    #[test]
    fn holdout_window_round_trips() {
        let observations = (0..45).map(|i| (start() + Duration::days(i), 20.0 + (i % 5) as f64));
        let s = DailySeries::from_observations(observations, GapFill::ZeroFill).unwrap();
        let output = ForecastEngine::default().forecast(&s).unwrap();

        let rescored = output.holdout.score().unwrap();
        assert_eq!(Some(rescored.samples), output.metrics.samples_evaluated);
        assert_relative_eq!(rescored.rmse, output.metrics.rmse.unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let engine = ForecastEngine::new(ForecastConfig::default().with_confidence_level(1.5));
        assert!(matches!(
            engine.forecast(&series(vec![1.0; 30])),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }
}
