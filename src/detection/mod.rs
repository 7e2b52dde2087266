//! Higher-order analytics over the daily series.
//!
//! This module provides tools for detecting:
//! - Anomalous days against a rolling baseline
//! - Monthly and weekday seasonality
//! - Trend direction, acceleration and growth potential

mod anomaly;
mod seasonality;
mod trend;

pub use anomaly::{detect_anomalies, AnomalyConfig, AnomalyImpact, AnomalyRecord, AnomalyReport};
pub use seasonality::{analyze_seasonality, SeasonalPattern, SeasonalityAnalysis, SeasonalityConfig};
pub use trend::{
    acceleration_rate, analyze_trend, estimate_growth, GrowthPotential, TrendAnalysis, TrendConfig,
};
