//! Aggregate and rolling business metrics of a daily sales series.

use crate::core::{is_weekend, DailySeries};
use crate::utils::stats::{coefficient_of_variation, growth_rate, linear_fit, mean, min_max, std_dev};
use serde::{Deserialize, Serialize};

/// Windows and caps used by the metrics calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Short growth window in days.
    pub short_window: usize,
    /// Long growth window in days.
    pub long_window: usize,
    /// Upper bound of `prediction_confidence`.
    pub confidence_cap: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            short_window: 7,
            long_window: 30,
            confidence_cap: 0.95,
        }
    }
}

impl MetricsConfig {
    pub fn with_windows(mut self, short_window: usize, long_window: usize) -> Self {
        self.short_window = short_window.max(1);
        self.long_window = long_window.max(1);
        self
    }
}

/// Scalar snapshot of a daily series.
///
/// Every field is a pure function of the series and the data-quality score;
/// undefined quantities are reported as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub total_revenue: f64,
    pub average_daily_sales: f64,
    pub max_daily_sales: f64,
    pub min_daily_sales: f64,
    pub sales_std_dev: f64,
    pub total_days: usize,
    pub date_range_days: i64,
    pub growth_rate_30d: f64,
    pub growth_rate_7d: f64,
    /// Coefficient of variation.
    pub volatility: f64,
    /// Short-window growth minus long-window growth, in percentage points.
    pub momentum: f64,
    pub trend_strength: f64,
    pub consistency_score: f64,
    pub prediction_confidence: f64,
    /// Mean weekend day over mean weekday; absent when either side is empty
    /// or the weekday mean is zero.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weekend_weekday_ratio: Option<f64>,
}

impl BusinessMetrics {
    /// Metrics with default windows.
    pub fn calculate(series: &DailySeries, quality_score: f64) -> Self {
        MetricsCalculator::default().calculate(series, quality_score)
    }
}

/// Derives [`BusinessMetrics`] from a series.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    config: MetricsConfig,
}

impl MetricsCalculator {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, series: &DailySeries, quality_score: f64) -> BusinessMetrics {
        let values = series.values();
        if values.is_empty() {
            return BusinessMetrics::default();
        }

        let (min, max) = min_max(values);
        let volatility = coefficient_of_variation(values);
        let growth_rate_7d = growth_rate(values, self.config.short_window);
        let growth_rate_30d = growth_rate(values, self.config.long_window);
        let trend_strength = trend_strength(values);
        let consistency_score = (1.0 - volatility).clamp(0.0, 1.0);
        let quality = if quality_score.is_finite() {
            quality_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let prediction_confidence = (0.6 * quality + 0.2 * trend_strength + 0.2 * consistency_score)
            .min(self.config.confidence_cap)
            .max(0.0);

        BusinessMetrics {
            total_revenue: values.iter().sum(),
            average_daily_sales: mean(values),
            max_daily_sales: max,
            min_daily_sales: min,
            sales_std_dev: std_dev(values),
            total_days: values.len(),
            date_range_days: series.span_days(),
            growth_rate_30d,
            growth_rate_7d,
            volatility,
            momentum: growth_rate_7d - growth_rate_30d,
            trend_strength,
            consistency_score,
            prediction_confidence,
            weekend_weekday_ratio: weekend_weekday_ratio(series),
        }
    }
}

/// Fitted change over the whole series relative to its value range, in `[0, 1]`.
pub fn trend_strength(values: &[f64]) -> f64 {
    let (min, max) = min_max(values);
    let range = max - min;
    if values.len() < 2 || range <= 0.0 {
        return 0.0;
    }
    let fit = linear_fit(values);
    let change = fit.slope.abs() * (values.len() - 1) as f64;
    (change / range).clamp(0.0, 1.0)
}

fn weekend_weekday_ratio(series: &DailySeries) -> Option<f64> {
    let (weekend, weekday): (Vec<_>, Vec<_>) = series.iter().partition(|(d, _)| is_weekend(*d));
    if weekend.is_empty() || weekday.is_empty() {
        return None;
    }
    let weekend: Vec<f64> = weekend.into_iter().map(|(_, v)| v).collect();
    let weekday: Vec<f64> = weekday.into_iter().map(|(_, v)| v).collect();
    let weekday_mean = mean(&weekday);
    if weekday_mean == 0.0 {
        return None;
    }
    Some(mean(&weekend) / weekday_mean)
}
