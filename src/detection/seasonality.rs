//! Calendar seasonality by month and by weekday.
//!
//! Days are grouped into calendar buckets; each bucket's seasonal impact is
//! the percentage deviation of its mean from the overall mean.

use crate::core::DailySeries;
use crate::utils::stats::{coefficient_of_variation, mean};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Configuration for seasonality analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalityConfig {
    /// Impact, in percent, above which a bucket is a peak period.
    pub peak_threshold_pct: f64,
    /// Days a bucket needs before it is reported.
    pub min_bucket_days: usize,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            peak_threshold_pct: 10.0,
            min_bucket_days: 1,
        }
    }
}

impl SeasonalityConfig {
    /// Set the peak threshold in percent.
    pub fn with_peak_threshold(mut self, pct: f64) -> Self {
        self.peak_threshold_pct = pct.max(0.0);
        self
    }
}

/// Mean and impact of one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPattern {
    /// Bucket label, e.g. `"December"` or `"Saturday"`.
    pub period: String,
    pub days: usize,
    pub mean: f64,
    /// Percentage deviation of `mean` from the overall mean.
    pub impact_pct: f64,
}

/// Seasonality facts of a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityAnalysis {
    /// Largest coefficient of variation of the bucket means, in `[0, 1]`.
    pub seasonal_strength: f64,
    /// Buckets whose impact exceeds the peak threshold, strongest first.
    pub peak_periods: Vec<String>,
    /// Largest positive bucket impact in percent.
    pub seasonal_impact: f64,
    pub monthly: Vec<SeasonalPattern>,
    pub weekly: Vec<SeasonalPattern>,
}

/// Bucket the series by month and weekday.
pub fn analyze_seasonality(series: &DailySeries, config: &SeasonalityConfig) -> SeasonalityAnalysis {
    if series.is_empty() {
        return SeasonalityAnalysis::default();
    }
    let overall = mean(series.values());

    let mut months: [Vec<f64>; 12] = Default::default();
    let mut weekdays: [Vec<f64>; 7] = Default::default();
    for (date, value) in series.iter() {
        months[date.month0() as usize].push(value);
        weekdays[date.weekday().num_days_from_monday() as usize].push(value);
    }

    let monthly = patterns(&months, &MONTH_NAMES, overall, config);
    let weekly = patterns(&weekdays, &WEEKDAY_NAMES, overall, config);

    let strength = |buckets: &[SeasonalPattern]| {
        let means: Vec<f64> = buckets.iter().map(|p| p.mean).collect();
        coefficient_of_variation(&means)
    };
    let seasonal_strength = strength(&monthly).max(strength(&weekly)).clamp(0.0, 1.0);

    let mut peaks: Vec<&SeasonalPattern> = monthly
        .iter()
        .chain(weekly.iter())
        .filter(|p| p.impact_pct > config.peak_threshold_pct)
        .collect();
    peaks.sort_by(|a, b| b.impact_pct.total_cmp(&a.impact_pct));
    let peak_periods = peaks.iter().map(|p| p.period.clone()).collect();

    let seasonal_impact = monthly
        .iter()
        .chain(weekly.iter())
        .map(|p| p.impact_pct)
        .fold(0.0, f64::max);

    SeasonalityAnalysis {
        seasonal_strength,
        peak_periods,
        seasonal_impact,
        monthly,
        weekly,
    }
}

fn patterns(
    buckets: &[Vec<f64>],
    labels: &[&str],
    overall: f64,
    config: &SeasonalityConfig,
) -> Vec<SeasonalPattern> {
    buckets
        .iter()
        .enumerate()
        .filter(|(_, values)| !values.is_empty() && values.len() >= config.min_bucket_days)
        .map(|(i, values)| {
            let m = mean(values);
            let impact_pct = if overall == 0.0 {
                0.0
            } else {
                (m - overall) / overall.abs() * 100.0
            };
            SeasonalPattern {
                period: labels[i].to_string(),
                days: values.len(),
                mean: m,
                impact_pct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(start: NaiveDate, values: Vec<f64>) -> DailySeries {
        DailySeries::from_values(start, values).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn flat_series_has_no_seasonality() {
        let analysis = analyze_seasonality(&series(monday(), vec![50.0; 90]), &SeasonalityConfig::default());
        assert_eq!(analysis.seasonal_strength, 0.0);
        assert!(analysis.peak_periods.is_empty());
        assert_eq!(analysis.seasonal_impact, 0.0);
        assert_eq!(analysis.monthly.len(), 3);
        assert_eq!(analysis.weekly.len(), 7);
    }

    #[test]
    fn weekend_peaks_are_reported() {
        let values: Vec<f64> = (0..28)
            .map(|i| if i % 7 >= 5 { 200.0 } else { 100.0 })
            .collect();
        let analysis = analyze_seasonality(&series(monday(), values), &SeasonalityConfig::default());

        // overall mean = 900 / 7
        let overall = 900.0 / 7.0;
        let saturday = &analysis.weekly[5];
        assert_eq!(saturday.period, "Saturday");
        assert_relative_eq!(saturday.impact_pct, (200.0 - overall) / overall * 100.0, epsilon = 1e-9);
        assert_eq!(analysis.peak_periods.len(), 2);
        assert!(analysis.peak_periods.contains(&"Sunday".to_string()));
        assert!(analysis.seasonal_strength > 0.3);
        assert_relative_eq!(analysis.seasonal_impact, saturday.impact_pct, epsilon = 1e-9);
    }

    #[test]
    fn december_peak() {
        let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let values: Vec<f64> = (0..61).map(|i| if i >= 30 { 300.0 } else { 100.0 }).collect();
        let analysis = analyze_seasonality(&series(start, values), &SeasonalityConfig::default());

        assert_eq!(analysis.monthly.len(), 2);
        assert_eq!(analysis.peak_periods[0], "December");
        assert!(analysis.seasonal_strength <= 1.0);
    }

    #[test]
    fn zero_series_is_neutral() {
        let analysis = analyze_seasonality(&series(monday(), vec![0.0; 20]), &SeasonalityConfig::default());
        assert_eq!(analysis.seasonal_strength, 0.0);
        assert!(analysis.weekly.iter().all(|p| p.impact_pct == 0.0));
    }
}
