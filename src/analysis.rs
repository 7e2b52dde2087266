//! End-to-end analysis of one uploaded table.
//!
//! [`SalesAnalyzer::analyze`] runs the stages in dependency order:
//!
//! 1. schema detection and validation (fails fast on an unusable table),
//! 2. the daily series,
//! 3. business metrics, product analysis and the ensemble forecast in parallel,
//! 4. trend, seasonality, anomaly and growth analysis,
//! 5. the optional prose annotations, after every numeric field is fixed.

use crate::config::AnalysisConfig;
use crate::core::{DailySeries, RawTable};
use crate::detection::{
    analyze_seasonality, analyze_trend, detect_anomalies, estimate_growth, AnomalyReport,
    GrowthPotential, SeasonalityAnalysis, TrendAnalysis,
};
use crate::error::Result;
use crate::forecast::{ExcludedModel, ForecastEngine, ForecastMetrics, ForecastPoint};
use crate::insights::{
    annotate, Annotations, BusinessInsight, InsightFacts, InsightProvider, NoInsights,
    Recommendation,
};
use crate::metrics::{BusinessMetrics, MetricsCalculator};
use crate::models::ModelRegistry;
use crate::products::{ProductAnalysis, ProductAnalyzer};
use crate::schema::{ColumnMap, SchemaDetector, ValidationReport};
use crate::utils::stats::mean;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the combined forecast in the result record.
pub const ENSEMBLE_MODEL: &str = "ensemble";

/// The forecast section of the result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub model: String,
    pub predictions: Vec<ForecastPoint>,
    pub metrics: ForecastMetrics,
    pub confidence_intervals: bool,
    pub periods: usize,
    /// Name of the insight provider that annotated the result; `"none"` when
    /// the provider timed out or failed.
    pub ai_model_used: String,
    pub models_used: Vec<String>,
    pub models_excluded: Vec<ExcludedModel>,
    pub weights: Vec<f64>,
}

/// Higher-order analytics of the daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub trend_analysis: TrendAnalysis,
    pub seasonality_analysis: SeasonalityAnalysis,
    pub anomaly_detection: AnomalyReport,
    pub growth_potential: GrowthPotential,
}

/// The complete result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub column_info: ColumnMap,
    pub data_validation: ValidationReport,
    pub business_metrics: BusinessMetrics,
    pub forecast: ForecastSummary,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product_analysis: Option<ProductAnalysis>,
    pub business_insights: Vec<BusinessInsight>,
    pub recommendations: Vec<Recommendation>,
    pub ai_analysis: AiAnalysis,
}

/// Runs every stage of the analysis over a [`RawTable`].
///
/// The analyzer holds no per-request state and can be shared between
/// threads; concurrent calls do not interact.
///
/// # Example
///
/// ```
/// use salescast::analysis::SalesAnalyzer;
/// use salescast::core::RawTable;
///
/// let headers = ["date".to_string(), "revenue".to_string()];
/// let rows: Vec<Vec<String>> = (1..=28)
///     .map(|d| vec![format!("2024-02-{d:02}"), format!("{}", 100 + d % 7)])
///     .collect();
/// let table = RawTable::from_strings(&headers, &rows).unwrap();
///
/// let report = SalesAnalyzer::default().analyze(&table).unwrap();
/// assert_eq!(report.column_info.sales, "revenue");
/// assert_eq!(report.forecast.predictions.len(), 90);
/// ```
pub struct SalesAnalyzer {
    config: AnalysisConfig,
    engine: ForecastEngine,
    provider: Arc<dyn InsightProvider>,
}

impl Default for SalesAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl fmt::Debug for SalesAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesAnalyzer")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl SalesAnalyzer {
    /// Analyzer without prose annotations.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            engine: ForecastEngine::new(config.forecast.clone()),
            config,
            provider: Arc::new(NoInsights),
        }
    }

    /// Annotate results with `provider`.
    pub fn with_provider(mut self, provider: Arc<dyn InsightProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Replace the default candidate models.
    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.engine = ForecastEngine::with_registry(self.config.forecast.clone(), registry);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one table.
    ///
    /// Fails with `SchemaUnresolved`, `InsufficientHistory` or
    /// `ForecastUnavailable`; every other problem is absorbed into the report.
    pub fn analyze(&self, table: &RawTable) -> Result<AnalysisReport> {
        let cfg = &self.config;

        let schema = SchemaDetector::new(cfg.schema.clone()).detect(table)?;
        let records = schema.records(table);
        let series = DailySeries::from_observations(
            records.iter().map(|r| (r.date, r.sales)),
            cfg.gap_fill,
        )?;
        debug!(
            days = series.len(),
            filled = series.filled_days(),
            gap_fill = ?cfg.gap_fill,
            "built daily series"
        );

        let quality = schema.report().quality_score;
        let has_products = schema.columns().product.is_some();

        let ((business_metrics, product_analysis), forecast) = rayon::join(
            || {
                rayon::join(
                    || MetricsCalculator::new(cfg.metrics.clone()).calculate(&series, quality),
                    || {
                        if has_products {
                            ProductAnalyzer::new(cfg.products.clone()).analyze(&records)
                        } else {
                            None
                        }
                    },
                )
            },
            || self.engine.forecast(&series),
        );
        let forecast = forecast?;

        let seasonality_analysis = analyze_seasonality(&series, &cfg.seasonality);
        let trend_analysis =
            analyze_trend(&series, &business_metrics, &seasonality_analysis, &cfg.trend);
        let anomaly_detection = detect_anomalies(&series, &cfg.anomaly);
        let growth_potential = estimate_growth(
            &business_metrics,
            &trend_analysis,
            &seasonality_analysis,
            &cfg.trend,
        );

        let outlook: Vec<f64> = forecast
            .predictions
            .iter()
            .take(30)
            .map(|p| p.predicted_sales)
            .collect();
        let facts = InsightFacts {
            column_info: schema.columns().clone(),
            business_metrics: business_metrics.clone(),
            forecast_metrics: forecast.metrics.clone(),
            forecast_30d_average: if outlook.is_empty() {
                None
            } else {
                Some(mean(&outlook))
            },
            trend_analysis: trend_analysis.clone(),
            seasonality_analysis: seasonality_analysis.clone(),
            anomaly_detection: anomaly_detection.clone(),
        };
        let (annotations, ai_model_used) =
            match annotate(self.provider.clone(), facts, cfg.insights.timeout()) {
                Some(annotations) => (annotations, self.provider.name().to_string()),
                None => (Annotations::default(), NoInsights.name().to_string()),
            };

        info!(
            days = series.len(),
            models = forecast.models_used.len(),
            anomalies = anomaly_detection.anomalies_detected,
            products = product_analysis.is_some(),
            "analysis complete"
        );

        let confidence_intervals = forecast
            .predictions
            .iter()
            .all(|p| p.lower_bound.is_some() && p.upper_bound.is_some());
        Ok(AnalysisReport {
            column_info: schema.columns().clone(),
            data_validation: schema.report().clone(),
            business_metrics,
            forecast: ForecastSummary {
                model: ENSEMBLE_MODEL.to_string(),
                periods: forecast.predictions.len(),
                predictions: forecast.predictions,
                metrics: forecast.metrics,
                confidence_intervals,
                ai_model_used,
                models_used: forecast.models_used,
                models_excluded: forecast.models_excluded,
                weights: forecast.weights,
            },
            product_analysis,
            business_insights: annotations.insights,
            recommendations: annotations.recommendations,
            ai_analysis: AiAnalysis {
                trend_analysis,
                seasonality_analysis,
                anomaly_detection,
                growth_potential,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::insights::RuleBasedInsights;
    use chrono::{Duration, NaiveDate};

    fn table(days: i64, products: &[&str]) -> RawTable {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut rows = Vec::new();
        for d in 0..days {
            let date = (start + Duration::days(d)).format("%Y-%m-%d").to_string();
            if products.is_empty() {
                rows.push(vec![date, format!("{}", 200 + (d % 7) * 10)]);
            } else {
                for (i, p) in products.iter().enumerate() {
                    rows.push(vec![
                        date.clone(),
                        format!("{}", 100 * (i + 1) as i64 + d),
                        p.to_string(),
                    ]);
                }
            }
        }
        let headers: &[&str] = if products.is_empty() {
            &["Order Date", "Total Sales"]
        } else {
            &["Order Date", "Total Sales", "Product"]
        };
        let rows: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        RawTable::from_strings(headers, &rows).unwrap()
    }

    #[test]
    fn full_report_without_products() {
        let report = SalesAnalyzer::default().analyze(&table(60, &[])).unwrap();

        assert_eq!(report.column_info.date, "Order Date");
        assert_eq!(report.column_info.sales, "Total Sales");
        assert!(report.data_validation.is_valid);
        assert_eq!(report.business_metrics.total_days, 60);
        assert_eq!(report.forecast.model, ENSEMBLE_MODEL);
        assert_eq!(report.forecast.periods, 90);
        assert!(report.forecast.confidence_intervals);
        assert_eq!(report.forecast.ai_model_used, "none");
        assert!(report.product_analysis.is_none());
        assert!(report.business_insights.is_empty());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.ai_analysis.seasonality_analysis.weekly.len(), 7);
    }

    #[test]
    fn products_and_rules() {
        let analyzer = SalesAnalyzer::default().with_provider(Arc::new(RuleBasedInsights));
        let report = analyzer.analyze(&table(45, &["widget", "gadget"])).unwrap();

        let products = report.product_analysis.unwrap();
        assert_eq!(products.top_products[0].product, "gadget");
        assert_eq!(products.performance_metrics.product_count, 2);
        assert_eq!(report.forecast.ai_model_used, "rule-based");
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn short_history_is_fatal() {
        let err = SalesAnalyzer::default().analyze(&table(10, &[])).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientHistory { needed: 14, got: 10 });
        assert!(err.is_fatal());
    }

    #[test]
    fn serializes_with_wire_names() {
        let report = SalesAnalyzer::default().analyze(&table(30, &[])).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["column_info"]["sales_column"], "Total Sales");
        assert!(json["data_validation"]["data_quality_score"].is_number());
        assert_eq!(json["forecast"]["predictions"][0]["date"], "2024-03-31");
        assert!(json.get("product_analysis").is_none());
        assert!(json["ai_analysis"]["anomaly_detection"]["anomaly_impact"].is_string());
    }
}
