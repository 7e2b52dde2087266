//! Annotation collaborators and the payload they exchange with the engine.

use crate::detection::{AnomalyImpact, AnomalyReport, SeasonalityAnalysis, TrendAnalysis};
use crate::error::{AnalysisError, Result};
use crate::forecast::ForecastMetrics;
use crate::metrics::BusinessMetrics;
use crate::schema::ColumnMap;
use serde::{Deserialize, Serialize};

/// Numeric facts handed to an insight provider. All values are final.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightFacts {
    pub column_info: ColumnMap,
    pub business_metrics: BusinessMetrics,
    pub forecast_metrics: ForecastMetrics,
    /// Mean predicted daily sales over the first 30 forecast days.
    pub forecast_30d_average: Option<f64>,
    pub trend_analysis: TrendAnalysis,
    pub seasonality_analysis: SeasonalityAnalysis,
    pub anomaly_detection: AnomalyReport,
}

/// A prose insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInsight {
    #[serde(rename = "type")]
    pub insight_type: String,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub action: String,
    pub confidence: f64,
}

/// A prose recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub timeframe: String,
    pub impact: String,
    pub ai_confidence: f64,
}

/// Insights and recommendations returned by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    pub insights: Vec<BusinessInsight>,
    pub recommendations: Vec<Recommendation>,
}

impl Annotations {
    /// Parse a collaborator payload of the form
    /// `{"insights": [...], "recommendations": [...]}`.
    ///
    /// Items missing an expected field are dropped; a missing array is
    /// treated as empty. Only a payload that is not a JSON object fails.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| AnalysisError::AnnotationFailed(e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            AnalysisError::AnnotationFailed("annotation payload is not an object".to_string())
        })?;

        Ok(Self {
            insights: keep_complete(object.get("insights")),
            recommendations: keep_complete(object.get("recommendations")),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.recommendations.is_empty()
    }
}

fn keep_complete<T: serde::de::DeserializeOwned>(items: Option<&serde_json::Value>) -> Vec<T> {
    items
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Turns computed facts into prose annotations.
///
/// Implementations may block (for example on a network call); the engine
/// bounds the call with a timeout, see [`annotate`](super::annotate).
pub trait InsightProvider: Send + Sync {
    fn summarize(&self, facts: &InsightFacts) -> Result<Annotations>;

    /// Reported as `ai_model_used` in the forecast record.
    fn name(&self) -> &str;
}

/// Offline stub returning no annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInsights;

impl InsightProvider for NoInsights {
    fn summarize(&self, _facts: &InsightFacts) -> Result<Annotations> {
        Ok(Annotations::default())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Deterministic insights from fixed thresholds on the metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedInsights;

impl RuleBasedInsights {
    fn insights(facts: &InsightFacts) -> Vec<BusinessInsight> {
        let m = &facts.business_metrics;
        let mut out = Vec::new();

        if m.growth_rate_30d > 20.0 {
            out.push(insight(
                "positive",
                "Strong Growth Momentum",
                format!("Sales grew {:.1}% over the last 30 days", m.growth_rate_30d),
                "high",
                "Consider scaling operations to maintain the growth trajectory",
                0.85,
            ));
        } else if m.growth_rate_30d < -10.0 {
            out.push(insight(
                "warning",
                "Declining Sales Trend",
                format!(
                    "Sales fell {:.1}% over the last 30 days",
                    m.growth_rate_30d.abs()
                ),
                "high",
                "Review marketing strategies and customer engagement",
                0.80,
            ));
        }

        if m.volatility > 0.5 {
            out.push(insight(
                "warning",
                "High Sales Volatility",
                "Sales show significant day-to-day fluctuations".to_string(),
                "medium",
                "Implement strategies to stabilize revenue streams",
                0.75,
            ));
        }

        if m.consistency_score < 0.6 {
            out.push(insight(
                "info",
                "Data Consistency Opportunity",
                "More consistent data collection could improve forecast accuracy".to_string(),
                "medium",
                "Standardize data entry processes and validation",
                0.70,
            ));
        }

        if let Some(future) = facts.forecast_30d_average {
            if m.average_daily_sales > 0.0 && future > m.average_daily_sales * 1.15 {
                out.push(insight(
                    "opportunity",
                    "Growth Acceleration Expected",
                    format!(
                        "The forecast averages {:.0}% above historical daily sales over the next 30 days",
                        (future / m.average_daily_sales - 1.0) * 100.0
                    ),
                    "high",
                    "Prepare inventory and scale marketing efforts",
                    0.90,
                ));
            }
        }

        if facts.anomaly_detection.anomaly_impact == AnomalyImpact::High {
            out.push(insight(
                "warning",
                "Unusual Sales Days",
                format!(
                    "{} days deviate strongly from their recent baseline",
                    facts.anomaly_detection.anomalies_detected
                ),
                "high",
                "Check flagged dates for data errors or one-off events",
                0.80,
            ));
        }

        if let Some(peak) = facts.seasonality_analysis.peak_periods.first() {
            out.push(insight(
                "info",
                "Seasonal Peak",
                format!("{peak} runs above the average sales level"),
                "medium",
                "Plan promotions and stock around peak periods",
                0.75,
            ));
        }

        if m.prediction_confidence > 0.8 {
            out.push(insight(
                "positive",
                "High Forecast Reliability",
                format!(
                    "Forecast confidence is {:.0}%",
                    m.prediction_confidence * 100.0
                ),
                "high",
                "Use forecasts for strategic planning",
                0.90,
            ));
        }
        out
    }

    fn recommendations(facts: &InsightFacts) -> Vec<Recommendation> {
        let m = &facts.business_metrics;
        let mut out = Vec::new();

        if m.volatility > 0.3 {
            out.push(recommendation(
                "inventory",
                "Optimize Inventory Management",
                "Track inventory dynamically to absorb sales fluctuations",
                "medium",
                "2-4 weeks",
                "Fewer stockouts and less overstock",
                0.80,
            ));
        } else if m.growth_rate_30d > 15.0 {
            out.push(recommendation(
                "inventory",
                "Scale Inventory Strategy",
                "Raise stock levels in line with recent growth",
                "high",
                "2 weeks",
                "Prevent stockouts during peak demand",
                0.92,
            ));
        }

        if m.growth_rate_30d < 5.0 {
            out.push(recommendation(
                "marketing",
                "Boost Marketing Efforts",
                "Increase promotional activity to stimulate growth",
                "high",
                "1-2 weeks",
                "Potential 15-20% revenue increase",
                0.75,
            ));
        }

        if m.momentum > 10.0 {
            out.push(recommendation(
                "finance",
                "Strategic Investment Opportunity",
                "Strong momentum suggests good timing for expansion",
                "high",
                "1 month",
                "Accelerate market share growth",
                0.88,
            ));
        }

        if m.total_days < 60 {
            out.push(recommendation(
                "operations",
                "Expand Historical Data",
                "Collect more history to improve forecast accuracy",
                "medium",
                "1-2 months",
                "More reliable forecasts",
                0.85,
            ));
        }

        out.push(recommendation(
            "finance",
            "Diversify Revenue Streams",
            "Explore new product categories or services to reduce dependency",
            "medium",
            "3-6 months",
            "Increase business resilience",
            0.70,
        ));
        out
    }
}

impl InsightProvider for RuleBasedInsights {
    fn summarize(&self, facts: &InsightFacts) -> Result<Annotations> {
        Ok(Annotations {
            insights: Self::insights(facts),
            recommendations: Self::recommendations(facts),
        })
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}

fn insight(
    kind: &str,
    title: &str,
    description: String,
    impact: &str,
    action: &str,
    confidence: f64,
) -> BusinessInsight {
    BusinessInsight {
        insight_type: kind.to_string(),
        title: title.to_string(),
        description,
        impact: impact.to_string(),
        action: action.to_string(),
        confidence,
    }
}

fn recommendation(
    category: &str,
    title: &str,
    description: &str,
    priority: &str,
    timeframe: &str,
    impact: &str,
    ai_confidence: f64,
) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority: priority.to_string(),
        timeframe: timeframe.to_string(),
        impact: impact.to_string(),
        ai_confidence,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::DailySeries;
    use crate::detection::{
        analyze_seasonality, analyze_trend, detect_anomalies, AnomalyConfig, SeasonalityConfig,
        TrendConfig,
    };
    use chrono::NaiveDate;

    pub(crate) fn facts_for(values: Vec<f64>) -> InsightFacts {
        let series =
            DailySeries::from_values(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values).unwrap();
        let metrics = BusinessMetrics::calculate(&series, 1.0);
        let seasonality = analyze_seasonality(&series, &SeasonalityConfig::default());
        InsightFacts {
            column_info: ColumnMap {
                sales: "sales".to_string(),
                date: "date".to_string(),
                product: None,
                region: None,
                customer: None,
                quantity: None,
                margin: None,
                cost: None,
                other: Vec::new(),
            },
            trend_analysis: analyze_trend(&series, &metrics, &seasonality, &TrendConfig::default()),
            anomaly_detection: detect_anomalies(&series, &AnomalyConfig::default()),
            seasonality_analysis: seasonality,
            business_metrics: metrics,
            forecast_metrics: ForecastMetrics::default(),
            forecast_30d_average: None,
        }
    }

    #[test]
    fn parses_complete_items_only() {
        let payload = r#"{
            "insights": [
                {"type": "info", "title": "t", "description": "d", "impact": "low",
                 "action": "a", "confidence": 0.5},
                {"type": "info", "title": "missing fields"}
            ],
            "recommendations": [
                {"category": "c", "title": "t", "description": "d", "priority": "low",
                 "timeframe": "now", "impact": "i", "ai_confidence": 0.7}
            ]
        }"#;
        let annotations = Annotations::from_json(payload).unwrap();
        assert_eq!(annotations.insights.len(), 1);
        assert_eq!(annotations.insights[0].insight_type, "info");
        assert_eq!(annotations.recommendations.len(), 1);
    }

    #[test]
    fn absent_arrays_are_empty() {
        let annotations = Annotations::from_json(r#"{"insights": "nope"}"#).unwrap();
        assert!(annotations.is_empty());
        assert!(Annotations::from_json("[1, 2]").is_err());
        assert!(Annotations::from_json("not json").is_err());
    }

    #[test]
    fn insight_type_serializes_as_type() {
        let json = serde_json::to_value(insight("info", "t", "d".into(), "low", "a", 0.5)).unwrap();
        assert_eq!(json["type"], "info");
        assert!(json.get("insight_type").is_none());
    }

    #[test]
    fn stub_returns_nothing() {
        let annotations = NoInsights.summarize(&facts_for(vec![100.0; 30])).unwrap();
        assert!(annotations.is_empty());
        assert_eq!(NoInsights.name(), "none");
    }

    #[test]
    fn rules_follow_metrics() {
        let flat = RuleBasedInsights.summarize(&facts_for(vec![100.0; 30])).unwrap();
        let titles: Vec<&str> = flat.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert!(titles.contains(&"Boost Marketing Efforts"));
        assert!(titles.contains(&"Expand Historical Data"));
        assert_eq!(titles.last(), Some(&"Diversify Revenue Streams"));
        assert!(flat.insights.iter().all(|i| i.title != "Strong Growth Momentum"));

        let growing: Vec<f64> = (0..90).map(|i| if i < 60 { 100.0 } else { 150.0 }).collect();
        let mut facts = facts_for(growing);
        facts.forecast_30d_average = Some(200.0);
        let annotations = RuleBasedInsights.summarize(&facts).unwrap();
        let titles: Vec<&str> = annotations.insights.iter().map(|i| i.title.as_str()).collect();
        assert!(titles.contains(&"Strong Growth Momentum"));
        assert!(titles.contains(&"Growth Acceleration Expected"));
    }
}
