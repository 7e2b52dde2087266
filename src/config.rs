//! Analysis configuration.
//!
//! Every threshold of the engine lives in one [`AnalysisConfig`] tree. All
//! sections default independently, so a configuration file only needs the
//! values it changes:
//!
//! ```toml
//! gap_fill = "forward_fill"
//!
//! [forecast]
//! horizon = 30
//! weighting = "equal"
//!
//! [anomaly]
//! z_threshold = 3.0
//! ```
//!
//! Environment variables prefixed with `SALESCAST_` override file values;
//! nested keys are separated by a double underscore, e.g.
//! `SALESCAST_FORECAST__HORIZON=30`.

use crate::core::GapFill;
use crate::detection::{AnomalyConfig, SeasonalityConfig, TrendConfig};
use crate::error::{AnalysisError, Result};
use crate::forecast::ForecastConfig;
use crate::insights::InsightConfig;
use crate::metrics::MetricsConfig;
use crate::products::ProductConfig;
use crate::schema::SchemaConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SALESCAST_";

/// Configuration of a full analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schema: SchemaConfig,
    /// How calendar days without records enter the daily series.
    pub gap_fill: GapFill,
    pub metrics: MetricsConfig,
    pub forecast: ForecastConfig,
    pub anomaly: AnomalyConfig,
    pub seasonality: SeasonalityConfig,
    pub trend: TrendConfig,
    pub products: ProductConfig,
    pub insights: InsightConfig,
}

impl AnalysisConfig {
    /// Merge defaults, an optional TOML file and `SALESCAST_` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AnalysisConfig::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(AnalysisError::InvalidParameter(format!(
                    "configuration file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Parse a TOML document on top of the defaults, ignoring the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::extract(
            Figment::from(Serialized::defaults(AnalysisConfig::default())).merge(Toml::string(toml)),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| AnalysisError::InvalidParameter(format!("configuration: {e}")))
    }

    pub fn with_forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = forecast;
        self
    }

    pub fn with_gap_fill(mut self, gap_fill: GapFill) -> Self {
        self.gap_fill = gap_fill;
        self
    }

    pub fn with_insights(mut self, insights: InsightConfig) -> Self {
        self.insights = insights;
        self
    }
}
