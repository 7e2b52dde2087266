//! Trend direction, acceleration and growth potential.

use super::seasonality::SeasonalityAnalysis;
use crate::core::DailySeries;
use crate::forecast::TrendDirection;
use crate::metrics::BusinessMetrics;
use crate::utils::stats::{linear_fit, mean};
use serde::{Deserialize, Serialize};

/// Thresholds for trend and growth analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Fitted change, relative to the mean, inside which the trend is stable.
    pub stable_band: f64,
    /// Scale of the trend contribution to estimated potential.
    pub potential_scale: f64,
    /// |momentum| at or above which growth is expected within 30 days.
    pub fast_momentum: f64,
    /// |momentum| at or above which growth is expected within 90 days.
    pub moderate_momentum: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            stable_band: 0.05,
            potential_scale: 20.0,
            fast_momentum: 20.0,
            moderate_momentum: 5.0,
        }
    }
}

/// Direction and shape of the historical trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub primary_trend: TrendDirection,
    /// Equal to the series' trend strength, in `[0, 1]`.
    pub trend_confidence: f64,
    /// Second-half slope minus first-half slope, as % of the mean per 30 days.
    pub acceleration_rate: f64,
    pub key_drivers: Vec<String>,
}

/// Extrapolated upside of the current trend and momentum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPotential {
    /// Percentage in `[0, 100]`.
    pub estimated_potential: f64,
    pub growth_levers: Vec<String>,
    pub timeline: String,
}

/// Classify the trend of `series` and name its likely drivers.
pub fn analyze_trend(
    series: &DailySeries,
    metrics: &BusinessMetrics,
    seasonality: &SeasonalityAnalysis,
    config: &TrendConfig,
) -> TrendAnalysis {
    let values = series.values();
    let m = mean(values);

    let primary_trend = if values.len() < 2 || m == 0.0 {
        TrendDirection::Stable
    } else {
        let fit = linear_fit(values);
        let change = fit.slope * (values.len() - 1) as f64;
        TrendDirection::classify(change / m.abs(), 0.0, config.stable_band)
    };

    TrendAnalysis {
        primary_trend,
        trend_confidence: metrics.trend_strength,
        acceleration_rate: acceleration_rate(values),
        key_drivers: key_drivers(primary_trend, metrics, seasonality),
    }
}

/// Change of slope between the two halves of the series.
pub fn acceleration_rate(values: &[f64]) -> f64 {
    let m = mean(values);
    if values.len() < 4 || m == 0.0 {
        return 0.0;
    }
    let half = values.len() / 2;
    let first = linear_fit(&values[..half]).slope;
    let second = linear_fit(&values[half..]).slope;
    (second - first) / m.abs() * 30.0 * 100.0
}

fn key_drivers(
    trend: TrendDirection,
    metrics: &BusinessMetrics,
    seasonality: &SeasonalityAnalysis,
) -> Vec<String> {
    let mut drivers = Vec::new();
    if metrics.trend_strength > 0.5 {
        match trend {
            TrendDirection::Upward => drivers.push("sustained_growth"),
            TrendDirection::Downward => drivers.push("sustained_decline"),
            TrendDirection::Stable => {}
        }
    }
    if metrics.momentum > 5.0 {
        drivers.push("recent_momentum");
    } else if metrics.momentum < -5.0 {
        drivers.push("slowing_recent_sales");
    }
    if seasonality.seasonal_strength > 0.2 {
        drivers.push("seasonal_demand");
    }
    match metrics.weekend_weekday_ratio {
        Some(ratio) if ratio > 1.2 => drivers.push("weekend_demand"),
        Some(ratio) if ratio < 0.8 => drivers.push("weekday_demand"),
        _ => {}
    }
    if metrics.volatility > 0.5 {
        drivers.push("high_volatility");
    }
    if drivers.is_empty() {
        drivers.push("stable_baseline_demand");
    }
    drivers.into_iter().map(String::from).collect()
}

/// Estimate growth potential from trend strength and momentum.
pub fn estimate_growth(
    metrics: &BusinessMetrics,
    trend: &TrendAnalysis,
    seasonality: &SeasonalityAnalysis,
    config: &TrendConfig,
) -> GrowthPotential {
    let direction = match trend.primary_trend {
        TrendDirection::Upward => 1.0,
        TrendDirection::Downward => -1.0,
        TrendDirection::Stable => 0.0,
    };
    let raw = config.potential_scale * direction * metrics.trend_strength + metrics.momentum;
    let estimated_potential = if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let speed = metrics.momentum.abs();
    let timeline = if speed >= config.fast_momentum {
        "30 days"
    } else if speed >= config.moderate_momentum {
        "90 days"
    } else {
        "6 months"
    };

    GrowthPotential {
        estimated_potential,
        growth_levers: growth_levers(trend.primary_trend, metrics, seasonality),
        timeline: timeline.to_string(),
    }
}

fn growth_levers(
    trend: TrendDirection,
    metrics: &BusinessMetrics,
    seasonality: &SeasonalityAnalysis,
) -> Vec<String> {
    let mut levers = Vec::new();
    match trend {
        TrendDirection::Upward => levers.push("Scale inventory and staffing ahead of demand"),
        TrendDirection::Downward => levers.push("Investigate the drivers of declining demand"),
        TrendDirection::Stable => levers.push("Expand product offerings"),
    }
    if seasonality.seasonal_strength > 0.2 && !seasonality.peak_periods.is_empty() {
        levers.push("Concentrate promotions around peak periods");
    }
    if metrics.volatility > 0.5 {
        levers.push("Stabilize demand with recurring offers");
    }
    levers.push("Increase marketing budget");
    levers.push("Optimize pricing strategy");
    levers.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{analyze_seasonality, SeasonalityConfig};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> DailySeries {
        DailySeries::from_values(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values).unwrap()
    }

    fn analyze(values: Vec<f64>) -> (BusinessMetrics, TrendAnalysis, GrowthPotential) {
        let s = series(values);
        let metrics = BusinessMetrics::calculate(&s, 1.0);
        let seasonality = analyze_seasonality(&s, &SeasonalityConfig::default());
        let config = TrendConfig::default();
        let trend = analyze_trend(&s, &metrics, &seasonality, &config);
        let growth = estimate_growth(&metrics, &trend, &seasonality, &config);
        (metrics, trend, growth)
    }

    #[test]
    fn flat_series_is_stable() {
        let (_, trend, growth) = analyze(vec![100.0; 60]);

        assert_eq!(trend.primary_trend, TrendDirection::Stable);
        assert_eq!(trend.acceleration_rate, 0.0);
        assert_eq!(trend.key_drivers, vec!["stable_baseline_demand".to_string()]);
        assert_eq!(growth.estimated_potential, 0.0);
        assert_eq!(growth.timeline, "6 months");
    }

    #[test]
    fn accelerating_series_has_potential() {
        // flat for 50 days, then +10 a day
        let values = (0..60)
            .map(|i| if i < 50 { 100.0 } else { 100.0 + 10.0 * (i - 49) as f64 })
            .collect();
        let (metrics, trend, growth) = analyze(values);

        assert_eq!(trend.primary_trend, TrendDirection::Upward);
        assert_relative_eq!(trend.trend_confidence, metrics.trend_strength, epsilon = 1e-12);
        assert!(metrics.momentum > 20.0);
        assert!(trend.key_drivers.contains(&"recent_momentum".to_string()));
        assert!(growth.estimated_potential > 0.0);
        assert!(growth.estimated_potential <= 100.0);
        assert_eq!(growth.timeline, "30 days");
    }

    #[test]
    fn linear_growth_decelerates_in_relative_terms() {
        let (metrics, trend, _) = analyze((0..60).map(|i| 100.0 + 2.0 * i as f64).collect());
        assert_eq!(trend.primary_trend, TrendDirection::Upward);
        assert!(trend.key_drivers.contains(&"sustained_growth".to_string()));
        assert!(metrics.momentum < 0.0);
    }

    #[test]
    fn falling_series_has_no_potential() {
        let (_, trend, growth) = analyze((0..60).map(|i| 500.0 - 3.0 * i as f64).collect());
        assert_eq!(trend.primary_trend, TrendDirection::Downward);
        assert_eq!(growth.estimated_potential, 0.0);
    }

    #[test]
    fn acceleration_detects_steepening() {
        let values: Vec<f64> = (0..60)
            .map(|i| if i < 30 { 100.0 } else { 100.0 + 5.0 * (i - 30) as f64 })
            .collect();
        assert!(acceleration_rate(&values) > 0.0);
        assert_eq!(acceleration_rate(&[1.0, 2.0]), 0.0);
    }

    #[test]
    fn timeline_follows_momentum() {
        let config = TrendConfig::default();
        let trend = TrendAnalysis {
            primary_trend: TrendDirection::Upward,
            trend_confidence: 0.5,
            acceleration_rate: 0.0,
            key_drivers: Vec::new(),
        };
        let seasonality = SeasonalityAnalysis::default();
        let with_momentum = |momentum: f64| BusinessMetrics {
            momentum,
            trend_strength: 0.5,
            ..BusinessMetrics::default()
        };

        assert_eq!(estimate_growth(&with_momentum(25.0), &trend, &seasonality, &config).timeline, "30 days");
        assert_eq!(estimate_growth(&with_momentum(-8.0), &trend, &seasonality, &config).timeline, "90 days");
        let slow = estimate_growth(&with_momentum(1.0), &trend, &seasonality, &config);
        assert_eq!(slow.timeline, "6 months");
        assert_relative_eq!(slow.estimated_potential, 11.0, epsilon = 1e-12);
    }
}
