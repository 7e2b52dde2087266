//! Recent-average baseline with gradual growth.

use crate::core::{DailySeries, Forecast};
use crate::error::{AnalysisError, Result};
use crate::models::Forecaster;
use crate::utils::stats::mean;

/// Largest growth rate, as a fraction per 30 days, the baseline extrapolates.
const MAX_GROWTH: f64 = 0.5;

/// Mean of the last `window` days, grown linearly at the recent rate.
///
/// The growth rate compares the last window with the one before it and is
/// applied as `base × (1 + g × h / 30)`. It is zero when fewer than two
/// windows of history exist and is clamped to ±50% per 30 days.
#[derive(Debug, Clone)]
pub struct RecentAverage {
    window: usize,
    base: Option<f64>,
    growth: f64,
}

impl RecentAverage {
    /// Seven-day window.
    pub fn new() -> Self {
        Self::with_window(7)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            base: None,
            growth: 0.0,
        }
    }

    /// Fitted growth fraction per 30 days.
    pub fn growth(&self) -> f64 {
        self.growth
    }
}

impl Default for RecentAverage {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for RecentAverage {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(AnalysisError::EmptyData);
        }

        let n = values.len();
        let w = self.window.min(n);
        let base = mean(&values[n - w..]);

        self.growth = if n >= 2 * self.window {
            let older = mean(&values[n - 2 * self.window..n - self.window]);
            if older > 0.0 {
                ((base - older) / older).clamp(-MAX_GROWTH, MAX_GROWTH)
            } else {
                0.0
            }
        } else {
            0.0
        };

        self.base = Some(base);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let base = self
            .base
            .ok_or_else(|| AnalysisError::ComputationError("model not fitted".to_string()))?;
        let point = (1..=horizon)
            .map(|h| base * (1.0 + self.growth * h as f64 / 30.0))
            .collect();
        Ok(Forecast::from_values(point))
    }

    fn name(&self) -> &str {
        "RecentAverage"
    }
}
