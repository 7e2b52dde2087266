//! Accuracy of predictions against withheld actual sales.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Error statistics of one prediction window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub mae: f64,
    pub rmse: f64,
    /// Mean absolute percentage error; `None` when any actual day is zero.
    pub mape: Option<f64>,
    /// Symmetric percentage error in `[0, 200]`.
    pub smape: f64,
    /// Coefficient of determination. Constant actuals score 1.0 when matched
    /// exactly and 0.0 otherwise.
    pub r_squared: f64,
    pub samples: usize,
}

/// Compare `predicted` with `actual` day by day.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    check_aligned(actual, predicted)?;
    let n = actual.len() as f64;
    let actual_mean = actual.iter().sum::<f64>() / n;

    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut sym_sum = 0.0;
    let mut spread = 0.0;
    let mut has_zero_day = false;

    for (&a, &p) in actual.iter().zip(predicted) {
        let err = a - p;
        abs_sum += err.abs();
        sq_sum += err * err;
        spread += (a - actual_mean) * (a - actual_mean);

        if a == 0.0 {
            has_zero_day = true;
        } else {
            pct_sum += (err / a).abs();
        }
        let scale = a.abs() + p.abs();
        if scale > 0.0 {
            sym_sum += 2.0 * err.abs() / scale;
        }
    }

    let r_squared = match (spread == 0.0, sq_sum == 0.0) {
        (true, true) => 1.0,
        (true, false) => 0.0,
        _ => 1.0 - sq_sum / spread,
    };

    Ok(AccuracyMetrics {
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
        mape: (!has_zero_day).then(|| 100.0 * pct_sum / n),
        smape: 100.0 * sym_sum / n,
        r_squared,
        samples: actual.len(),
    })
}

/// Mean absolute error, `NaN` for misaligned or empty input.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if check_aligned(actual, predicted).is_err() {
        return f64::NAN;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    total / actual.len() as f64
}

fn check_aligned(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}
