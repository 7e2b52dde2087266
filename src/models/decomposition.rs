//! Linear trend plus additive day-of-week seasonality.

use crate::core::{DailySeries, Forecast};
use crate::error::{AnalysisError, Result};
use crate::models::Forecaster;
use crate::utils::stats::{linear_fit, mean, LinearFit};
use chrono::{Datelike, Duration, NaiveDate};

/// Days of history needed before weekday indices are estimated.
const MIN_WEEKS_FOR_SEASONALITY: usize = 2;

/// Trend + weekly seasonality decomposition forecaster.
///
/// The model is `ŷ_t = a + b·t + s_{weekday(t)}`, where the line is fitted
/// by least squares and `s` is the mean detrended value per weekday,
/// centred to sum to zero. With fewer than two full weeks the seasonal
/// component is omitted.
#[derive(Debug, Clone, Default)]
pub struct SeasonalTrend {
    trend: Option<LinearFit>,
    weekday_index: [f64; 7],
    last_date: Option<NaiveDate>,
    n: usize,
}

impl SeasonalTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Additive weekday effects, Monday first.
    pub fn weekday_index(&self) -> &[f64; 7] {
        &self.weekday_index
    }

    /// Fitted trend line, if the model has been fitted.
    pub fn trend(&self) -> Option<&LinearFit> {
        self.trend.as_ref()
    }

    fn seasonal(&self, date: NaiveDate) -> f64 {
        self.weekday_index[date.weekday().num_days_from_monday() as usize]
    }
}

impl Forecaster for SeasonalTrend {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        if series.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                needed: 2,
                got: series.len(),
            });
        }

        let values = series.values();
        let trend = linear_fit(values);

        let mut index = [0.0; 7];
        if series.len() >= 7 * MIN_WEEKS_FOR_SEASONALITY {
            let mut buckets: [Vec<f64>; 7] = Default::default();
            for (i, (date, value)) in series.iter().enumerate() {
                let day = date.weekday().num_days_from_monday() as usize;
                buckets[day].push(value - trend.at(i as f64));
            }
            for (slot, bucket) in index.iter_mut().zip(&buckets) {
                *slot = mean(bucket);
            }
            let centre = mean(&index);
            for slot in &mut index {
                *slot -= centre;
            }
        }

        self.trend = Some(trend);
        self.weekday_index = index;
        self.last_date = series.last_date();
        self.n = series.len();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let (trend, last_date) = match (self.trend, self.last_date) {
            (Some(trend), Some(last)) => (trend, last),
            _ => return Err(AnalysisError::ComputationError("model not fitted".to_string())),
        };

        let last_index = (self.n - 1) as f64;
        let point = (1..=horizon)
            .map(|h| {
                let date = last_date + Duration::days(h as i64);
                trend.at(last_index + h as f64) + self.seasonal(date)
            })
            .collect();
        Ok(Forecast::from_values(point))
    }

    fn name(&self) -> &str {
        "SeasonalTrend"
    }
}
