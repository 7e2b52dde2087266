//! Per-product revenue ranking, margins and growth opportunities.

use crate::core::{DailySeries, GapFill};
use crate::schema::SalesRecord;
use crate::utils::stats::{growth_rate, mean, variance};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Thresholds of the product analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Number of products reported in the ranking.
    pub top_n: usize,
    /// Growth, in percent, an opportunity must exceed.
    pub min_growth_pct: f64,
    /// Revenue an opportunity must exceed.
    pub min_revenue: f64,
    /// Window of the per-product growth rate, in days.
    pub growth_window: usize,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            min_growth_pct: 10.0,
            min_revenue: 1000.0,
            growth_window: 30,
        }
    }
}

impl ProductConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_opportunity_thresholds(mut self, min_growth_pct: f64, min_revenue: f64) -> Self {
        self.min_growth_pct = min_growth_pct;
        self.min_revenue = min_revenue;
        self
    }
}

/// Aggregates of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product: String,
    pub revenue: f64,
    /// Units sold; see `units_estimated`.
    pub units: f64,
    /// Whether `units` was derived as revenue ÷ average order value because
    /// no quantity column exists.
    pub units_estimated: bool,
    /// Growth over the product's own last `growth_window` days, in percent.
    pub growth: f64,
    /// Margin in percent, absent without a margin or cost column.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub margin: Option<f64>,
    /// Share of total revenue, in percent.
    pub revenue_share: f64,
    pub transactions: usize,
}

/// A product with strong growth and meaningful revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthOpportunity {
    pub product: String,
    /// The product's growth rate, in percent.
    pub potential: f64,
    pub revenue: f64,
    pub reason: String,
}

/// Portfolio-level statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Revenue share of the top product, in percent.
    pub product_concentration: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub average_margin: Option<f64>,
    /// Sample variance of product growth rates.
    pub growth_variance: f64,
    pub product_count: usize,
}

/// Result of the product analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub top_products: Vec<ProductSummary>,
    pub growth_opportunities: Vec<GrowthOpportunity>,
    pub performance_metrics: PerformanceMetrics,
}

#[derive(Debug, Default)]
struct Accumulator {
    revenue: f64,
    quantity: f64,
    transactions: usize,
    margins: Vec<f64>,
    costed_revenue: f64,
    cost: f64,
    costed: bool,
    daily: Vec<(NaiveDate, f64)>,
}

impl Accumulator {
    fn margin(&self) -> Option<f64> {
        if !self.margins.is_empty() {
            return Some(mean(&self.margins));
        }
        if self.costed && self.costed_revenue != 0.0 {
            return Some((self.costed_revenue - self.cost) / self.costed_revenue * 100.0);
        }
        None
    }
}

/// Groups records by product and ranks them.
#[derive(Debug, Clone, Default)]
pub struct ProductAnalyzer {
    config: ProductConfig,
}

impl ProductAnalyzer {
    pub fn new(config: ProductConfig) -> Self {
        Self { config }
    }

    /// Analyze the labelled records; `None` when no record has a product.
    pub fn analyze(&self, records: &[SalesRecord]) -> Option<ProductAnalysis> {
        let labelled: Vec<&SalesRecord> = records.iter().filter(|r| r.product.is_some()).collect();
        let first = labelled.iter().map(|r| r.date).min()?;
        let last = labelled.iter().map(|r| r.date).max()?;

        let has_quantity = labelled.iter().any(|r| r.quantity.is_some());
        let total_revenue: f64 = labelled.iter().map(|r| r.sales).sum();
        let average_order = total_revenue / labelled.len() as f64;

        let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
        for record in &labelled {
            let name = match record.product.as_deref() {
                Some(name) => name,
                None => continue,
            };
            let acc = groups.entry(name).or_default();
            acc.revenue += record.sales;
            acc.transactions += 1;
            acc.quantity += record.quantity.unwrap_or(0.0);
            if let Some(margin) = record.margin {
                acc.margins.push(margin);
            }
            if let Some(cost) = record.cost {
                acc.costed = true;
                acc.cost += cost;
                acc.costed_revenue += record.sales;
            }
            acc.daily.push((record.date, record.sales));
        }
        debug!(products = groups.len(), "grouped product records");

        let window = self.config.growth_window;
        let mut summaries: Vec<ProductSummary> = groups
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(name, acc)| {
                let growth = DailySeries::from_observations_in_range(
                    acc.daily.iter().copied(),
                    first,
                    last,
                    GapFill::ZeroFill,
                )
                .map(|series| growth_rate(series.values(), window))
                .unwrap_or(0.0);

                let units = if has_quantity {
                    acc.quantity
                } else if average_order != 0.0 {
                    acc.revenue / average_order
                } else {
                    0.0
                };

                ProductSummary {
                    product: name.to_string(),
                    revenue: acc.revenue,
                    units,
                    units_estimated: !has_quantity,
                    growth,
                    margin: acc.margin(),
                    revenue_share: share(acc.revenue, total_revenue),
                    transactions: acc.transactions,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.revenue
                .total_cmp(&a.revenue)
                .then_with(|| a.product.cmp(&b.product))
        });

        let margins: Vec<f64> = summaries.iter().filter_map(|s| s.margin).collect();
        let growths: Vec<f64> = summaries.iter().map(|s| s.growth).collect();
        let performance_metrics = PerformanceMetrics {
            product_concentration: summaries
                .first()
                .map(|s| share(s.revenue, total_revenue))
                .unwrap_or(0.0),
            average_margin: if margins.is_empty() {
                None
            } else {
                Some(mean(&margins))
            },
            growth_variance: variance(&growths),
            product_count: summaries.len(),
        };

        let mut growth_opportunities: Vec<GrowthOpportunity> = summaries
            .iter()
            .filter(|s| s.growth > self.config.min_growth_pct && s.revenue > self.config.min_revenue)
            .map(|s| GrowthOpportunity {
                product: s.product.clone(),
                potential: s.growth,
                revenue: s.revenue,
                reason: format!(
                    "Revenue grew {:.1}% over the last {} days",
                    s.growth, window
                ),
            })
            .collect();
        growth_opportunities.sort_by(|a, b| {
            b.potential
                .total_cmp(&a.potential)
                .then_with(|| a.product.cmp(&b.product))
        });

        summaries.truncate(self.config.top_n);
        Some(ProductAnalysis {
            top_products: summaries,
            growth_opportunities,
            performance_metrics,
        })
    }
}

fn share(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}
