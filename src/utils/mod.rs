//! Shared numeric utilities.

pub mod metrics;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use stats::{growth_rate, linear_fit, LinearFit};
