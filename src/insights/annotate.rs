//! Bounded invocation of an insight provider.

use super::provider::{Annotations, InsightFacts, InsightProvider};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration of the annotation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Upper bound on the provider call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

impl InsightConfig {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Run `provider` on its own thread and wait at most `timeout`.
///
/// A provider that outlives the timeout keeps running detached; its result
/// is discarded.
pub fn request_annotations(
    provider: Arc<dyn InsightProvider>,
    facts: InsightFacts,
    timeout: Duration,
) -> Result<Annotations> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("salescast-insights".to_string())
        .spawn(move || {
            let result = provider.summarize(&facts);
            // the receiver is gone after a timeout
            let _ = tx.send(result);
        })
        .map_err(|e| AnalysisError::AnnotationFailed(e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(AnalysisError::AnnotationTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(AnalysisError::AnnotationFailed(
            "insight provider stopped without a result".to_string(),
        )),
    }
}

/// Like [`request_annotations`], but a timeout or failure is logged and
/// yields `None`. The numeric result never depends on this call.
pub fn annotate(
    provider: Arc<dyn InsightProvider>,
    facts: InsightFacts,
    timeout: Duration,
) -> Option<Annotations> {
    let name = provider.name().to_string();
    match request_annotations(provider, facts, timeout) {
        Ok(annotations) => {
            debug!(
                provider = %name,
                insights = annotations.insights.len(),
                recommendations = annotations.recommendations.len(),
                "received annotations"
            );
            Some(annotations)
        }
        Err(e) => {
            warn!(provider = %name, error = %e, "annotations unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::provider::tests::facts_for;
    use crate::insights::{NoInsights, RuleBasedInsights};

    struct Slow;

    impl InsightProvider for Slow {
        fn summarize(&self, _facts: &InsightFacts) -> Result<Annotations> {
            thread::sleep(Duration::from_millis(500));
            RuleBasedInsights.summarize(&facts_for(vec![1.0; 20]))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct Failing;

    impl InsightProvider for Failing {
        fn summarize(&self, _facts: &InsightFacts) -> Result<Annotations> {
            Err(AnalysisError::AnnotationFailed("upstream 503".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn timeout_is_reported() {
        let err = request_annotations(
            Arc::new(Slow),
            facts_for(vec![100.0; 30]),
            Duration::from_millis(20),
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::AnnotationTimeout { timeout_ms: 20 });
        assert!(!err.is_fatal());
    }

    #[test]
    fn timeout_and_failure_yield_nothing() {
        let facts = facts_for(vec![100.0; 30]);
        assert_eq!(annotate(Arc::new(Slow), facts.clone(), Duration::from_millis(20)), None);
        assert_eq!(annotate(Arc::new(Failing), facts, Duration::from_secs(1)), None);
    }

    #[test]
    fn fast_provider_result_is_returned() {
        let facts = facts_for(vec![100.0; 30]);
        let annotations =
            annotate(Arc::new(RuleBasedInsights), facts.clone(), Duration::from_secs(5)).unwrap();
        assert!(!annotations.recommendations.is_empty());
        let none = annotate(Arc::new(NoInsights), facts, Duration::from_secs(5)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn default_timeout() {
        assert_eq!(InsightConfig::default().timeout(), Duration::from_secs(5));
    }
}
