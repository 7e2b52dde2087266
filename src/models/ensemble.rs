//! Ensemble combination of candidate forecasts.
//!
//! Weights are fixed once from holdout errors and then applied to every
//! horizon step; the spread of the members around the combined value is
//! reported per step for uncertainty bounds.

use crate::error::{AnalysisError, Result};
use crate::utils::stats::weighted_mean_std;
use serde::{Deserialize, Serialize};

/// Floor applied to holdout errors before inversion.
const MIN_ERROR: f64 = 1e-9;

/// Rule for weighting ensemble members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Proportional to the inverse holdout MAE.
    #[default]
    InverseError,
    /// Every member counts the same.
    Equal,
}

/// Combines aligned member predictions under a fixed weighting rule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ensemble {
    weighting: Weighting,
}

impl Ensemble {
    pub fn new(weighting: Weighting) -> Self {
        Self { weighting }
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Normalised member weights from their holdout errors.
    ///
    /// Non-finite errors fall back to equal weights.
    pub fn weights(&self, errors: &[f64]) -> Result<Vec<f64>> {
        if errors.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        let n = errors.len();
        let equal = vec![1.0 / n as f64; n];

        match self.weighting {
            Weighting::Equal => Ok(equal),
            Weighting::InverseError => {
                if errors.iter().any(|e| !e.is_finite()) {
                    return Ok(equal);
                }
                let inverse: Vec<f64> = errors.iter().map(|e| 1.0 / e.max(MIN_ERROR)).collect();
                let total: f64 = inverse.iter().sum();
                Ok(inverse.iter().map(|w| w / total).collect())
            }
        }
    }

    /// Weighted combination of aligned member predictions.
    pub fn combine(&self, members: &[Vec<f64>], weights: &[f64]) -> Result<Vec<f64>> {
        let horizon = check_aligned(members, weights)?;
        Ok((0..horizon)
            .map(|h| {
                members
                    .iter()
                    .zip(weights)
                    .map(|(m, w)| m[h] * w)
                    .sum()
            })
            .collect())
    }

    /// Weighted standard deviation of the members at each step.
    pub fn dispersion(&self, members: &[Vec<f64>], weights: &[f64]) -> Result<Vec<f64>> {
        let horizon = check_aligned(members, weights)?;
        Ok((0..horizon)
            .map(|h| {
                let column: Vec<f64> = members.iter().map(|m| m[h]).collect();
                weighted_mean_std(&column, weights).1
            })
            .collect())
    }
}

fn check_aligned(members: &[Vec<f64>], weights: &[f64]) -> Result<usize> {
    let first = members.first().ok_or(AnalysisError::EmptyData)?;
    if weights.len() != members.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: members.len(),
            got: weights.len(),
        });
    }
    let horizon = first.len();
    if let Some(bad) = members.iter().find(|m| m.len() != horizon) {
        return Err(AnalysisError::DimensionMismatch {
            expected: horizon,
            got: bad.len(),
        });
    }
    Ok(horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_error_weights_favour_accurate_members() {
        let weights = Ensemble::default().weights(&[1.0, 3.0]).unwrap();
        assert_relative_eq!(weights[0], 0.75, epsilon = 1e-12);
        assert_relative_eq!(weights[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn perfect_member_dominates() {
        let weights = Ensemble::default().weights(&[0.0, 2.0]).unwrap();
        assert!(weights[0] > 0.999_999);
        assert_relative_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn equal_weighting() {
        let weights = Ensemble::new(Weighting::Equal).weights(&[1.0, 5.0, 9.0]).unwrap();
        for w in weights {
            assert_relative_eq!(w, 1.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn combine_and_dispersion() {
        let members = vec![vec![10.0, 20.0], vec![30.0, 20.0]];
        let ensemble = Ensemble::new(Weighting::Equal);
        let weights = ensemble.weights(&[1.0, 1.0]).unwrap();

        assert_eq!(ensemble.combine(&members, &weights).unwrap(), vec![20.0, 20.0]);
        let spread = ensemble.dispersion(&members, &weights).unwrap();
        assert_relative_eq!(spread[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(spread[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn misaligned_members_are_rejected() {
        let ensemble = Ensemble::default();
        assert!(matches!(
            ensemble.combine(&[vec![1.0, 2.0], vec![1.0]], &[0.5, 0.5]),
            Err(AnalysisError::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(ensemble.combine(&[], &[]).is_err());
        assert!(ensemble.weights(&[]).is_err());
    }

    #[test]
    fn weighting_serializes_snake_case() {
        let json = serde_json::to_string(&Weighting::InverseError).unwrap();
        assert_eq!(json, "\"inverse_error\"");
    }
}
