//! Rolling z-score anomaly detection.
//!
//! Each day is compared with the mean and standard deviation of the days
//! immediately preceding it, so level shifts and seasonality only affect
//! the first few days after they begin. Days at the start of the series,
//! which lack a trailing baseline, are compared with the days that follow.

use crate::core::DailySeries;
use crate::utils::stats::{mean, std_dev};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Severity of the anomalies found in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyImpact {
    Low,
    Medium,
    High,
}

impl AnomalyImpact {
    /// Fixed follow-up actions for each severity.
    pub fn recommended_actions(self) -> &'static [&'static str] {
        match self {
            AnomalyImpact::Low => &[
                "Monitor for similar patterns",
                "Review outlier dates for special events",
            ],
            AnomalyImpact::Medium => &[
                "Review outlier dates for special events",
                "Verify data entry accuracy",
                "Monitor for similar patterns",
            ],
            AnomalyImpact::High => &[
                "Investigate flagged dates immediately",
                "Verify data entry accuracy",
                "Exclude confirmed one-off events from planning baselines",
                "Set up alerts for large deviations",
            ],
        }
    }
}

/// Configuration for anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Trailing days forming the baseline.
    pub window: usize,
    /// Trailing days required before the trailing baseline is used; earlier
    /// days are judged against the following `window` days.
    pub min_baseline: usize,
    /// Absolute z-score above which a day is flagged.
    pub z_threshold: f64,
    /// Lower bound on the baseline deviation, relative to |baseline mean|.
    pub sigma_floor_ratio: f64,
    pub high_count: usize,
    pub high_z: f64,
    pub medium_count: usize,
    pub medium_z: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window: 14,
            min_baseline: 7,
            z_threshold: 2.5,
            sigma_floor_ratio: 0.01,
            high_count: 5,
            high_z: 5.0,
            medium_count: 2,
            medium_z: 3.5,
        }
    }
}

impl AnomalyConfig {
    /// Set the z-score threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold.max(0.0);
        self
    }

    /// Set the trailing window length.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(2);
        self.min_baseline = self.min_baseline.min(self.window);
        self
    }

    fn impact(&self, anomalies: &[AnomalyRecord]) -> AnomalyImpact {
        let count = anomalies.len();
        let max_z = anomalies
            .iter()
            .map(|a| a.z_score.abs())
            .fold(0.0, f64::max);
        if count >= self.high_count || max_z >= self.high_z {
            AnomalyImpact::High
        } else if count >= self.medium_count || max_z >= self.medium_z {
            AnomalyImpact::Medium
        } else {
            AnomalyImpact::Low
        }
    }
}

/// One flagged day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub date: NaiveDate,
    pub value: f64,
    /// Mean of the baseline window.
    pub baseline: f64,
    /// `value - baseline`.
    pub deviation: f64,
    pub z_score: f64,
}

/// Anomaly summary of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies_detected: usize,
    pub anomaly_impact: AnomalyImpact,
    pub recommended_actions: Vec<String>,
    pub anomalies: Vec<AnomalyRecord>,
}

/// Flag days that deviate from their trailing baseline.
pub fn detect_anomalies(series: &DailySeries, config: &AnomalyConfig) -> AnomalyReport {
    let values = series.values();
    let dates = series.dates();
    let min_baseline = config.min_baseline.max(2);

    let n = values.len();
    let mut anomalies = Vec::new();
    for t in 0..n {
        let baseline = if t >= min_baseline {
            &values[t.saturating_sub(config.window)..t]
        } else {
            &values[(t + 1).min(n)..(t + 1 + config.window).min(n)]
        };
        if baseline.len() < min_baseline {
            continue;
        }
        let m = mean(baseline);
        let sigma = std_dev(baseline)
            .max(config.sigma_floor_ratio * m.abs())
            .max(1e-9);
        let deviation = values[t] - m;
        let z_score = deviation / sigma;
        if z_score.abs() > config.z_threshold {
            anomalies.push(AnomalyRecord {
                date: dates[t],
                value: values[t],
                baseline: m,
                deviation,
                z_score,
            });
        }
    }

    let impact = config.impact(&anomalies);
    AnomalyReport {
        anomalies_detected: anomalies.len(),
        anomaly_impact: impact,
        recommended_actions: impact
            .recommended_actions()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        anomalies,
    }
}
