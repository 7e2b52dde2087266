//! Prose insights and recommendations from an external collaborator.
//!
//! The engine computes every numeric field first and then hands an
//! [`InsightFacts`] record to an [`InsightProvider`]. Providers run under a
//! timeout; their output is attached as opaque annotations.

mod annotate;
mod provider;

pub use annotate::{annotate, request_annotations, InsightConfig};
pub use provider::{
    Annotations, BusinessInsight, InsightFacts, InsightProvider, NoInsights, Recommendation,
    RuleBasedInsights,
};
