//! Damped Holt linear trend smoothing.

use crate::core::{DailySeries, Forecast};
use crate::error::{AnalysisError, Result};
use crate::models::Forecaster;

const ALPHA_GRID: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
const BETA_GRID: [f64; 4] = [0.01, 0.05, 0.1, 0.2];

/// Holt's linear trend with a damped trend component.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + φ × b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × φ × b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + (φ + φ² + ... + φ^h) × b_t`
///
/// α and β are chosen by exhaustive search over a fixed grid, minimising
/// the one-step-ahead squared error; the first grid point wins ties, so the
/// choice is deterministic.
#[derive(Debug, Clone)]
pub struct DampedHolt {
    phi: f64,
    alpha: Option<f64>,
    beta: Option<f64>,
    level: Option<f64>,
    trend: Option<f64>,
}

struct Pass {
    level: f64,
    trend: f64,
    sse: f64,
}

impl DampedHolt {
    /// Create a model with damping factor 0.98.
    pub fn new() -> Self {
        Self::with_phi(0.98)
    }

    /// Create a model with a custom damping factor.
    pub fn with_phi(phi: f64) -> Self {
        Self {
            phi: phi.clamp(0.8, 1.0),
            alpha: None,
            beta: None,
            level: None,
            trend: None,
        }
    }

    /// Selected level smoothing parameter.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Selected trend smoothing parameter.
    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    fn run(&self, values: &[f64], alpha: f64, beta: f64) -> Pass {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut sse = 0.0;

        for &y in &values[1..] {
            let forecast = level + self.phi * trend;
            sse += (y - forecast).powi(2);

            let previous = level;
            level = alpha * y + (1.0 - alpha) * forecast;
            trend = beta * (level - previous) + (1.0 - beta) * self.phi * trend;
        }

        Pass {
            level,
            trend,
            sse,
        }
    }
}

impl Default for DampedHolt {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for DampedHolt {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        let values = series.values();
        if values.len() < 3 {
            return Err(AnalysisError::InsufficientData {
                needed: 3,
                got: values.len(),
            });
        }

        let mut best: Option<(f64, f64, Pass)> = None;
        for &alpha in &ALPHA_GRID {
            for &beta in &BETA_GRID {
                let pass = self.run(values, alpha, beta);
                if !pass.sse.is_finite() {
                    continue;
                }
                match &best {
                    Some((_, _, current)) if pass.sse >= current.sse => {}
                    _ => best = Some((alpha, beta, pass)),
                }
            }
        }

        let (alpha, beta, pass) = best.ok_or_else(|| {
            AnalysisError::ComputationError("no finite smoothing parameters".to_string())
        })?;

        self.alpha = Some(alpha);
        self.beta = Some(beta);
        self.level = Some(pass.level);
        self.trend = Some(pass.trend);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let (level, trend) = match (self.level, self.trend) {
            (Some(level), Some(trend)) => (level, trend),
            _ => return Err(AnalysisError::ComputationError("model not fitted".to_string())),
        };

        let mut damping = 0.0;
        let mut power = 1.0;
        let point = (0..horizon)
            .map(|_| {
                power *= self.phi;
                damping += power;
                level + damping * trend
            })
            .collect();
        Ok(Forecast::from_values(point))
    }

    fn name(&self) -> &str {
        "DampedHolt"
    }
}
