//! # salescast
//!
//! Sales analytics and ensemble forecasting engine.
//!
//! Takes one tabular sales dataset, infers which columns hold dates, sales
//! and product labels, derives business metrics, forecasts the next 90 days
//! with an ensemble of candidate models and uncertainty bounds, and reports
//! anomalies, seasonality, trend and product-level opportunities.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod forecast;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod products;
pub mod schema;
pub mod utils;

pub use analysis::{AnalysisReport, SalesAnalyzer};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};

pub mod prelude {
    pub use crate::analysis::{AnalysisReport, SalesAnalyzer};
    pub use crate::config::AnalysisConfig;
    pub use crate::core::{DailySeries, Forecast, GapFill, RawTable};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::forecast::{ForecastConfig, ForecastEngine};
    pub use crate::insights::{InsightProvider, NoInsights, RuleBasedInsights};
    pub use crate::models::Forecaster;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
