//! Product-level revenue analysis.

mod analyzer;

pub use analyzer::{
    GrowthOpportunity, PerformanceMetrics, ProductAnalysis, ProductAnalyzer, ProductConfig,
    ProductSummary,
};
