//! Point forecast produced by a single model or by the ensemble.

use crate::error::{AnalysisError, Result};

/// Point predictions for consecutive days after a fitted series.
///
/// Uncertainty bounds are derived by the ensemble, not by single models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { point: values }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Check that every prediction is finite.
    pub fn ensure_finite(&self) -> Result<()> {
        if let Some(step) = self.point.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::ComputationError(format!(
                "non-finite prediction at step {}",
                step + 1
            )));
        }
        Ok(())
    }
}
