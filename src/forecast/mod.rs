//! Ensemble forecasting with holdout evaluation and uncertainty bounds.

mod engine;
mod holdout;
mod point;

pub use engine::{ExcludedModel, ForecastConfig, ForecastEngine, ForecastOutput};
pub use holdout::{evaluate_candidate, holdout_size, CandidateRun, HoldoutWindow};
pub use point::{ForecastMetrics, ForecastPoint, TrendDirection};
