//! Business metrics derived from the validated daily series.

mod business;

pub use business::{trend_strength, BusinessMetrics, MetricsCalculator, MetricsConfig};
