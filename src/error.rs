//! Error types for the salescast engine.

use crate::schema::ValidationReport;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while analysing a sales dataset.
///
/// Some variants are fatal and abort the request at a stage boundary; the
/// others are recovered inside the engine and only reduce coverage or
/// confidence in the result. See [`AnalysisError::is_fatal`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No usable sales or date column, or too few parseable rows.
    #[error("schema unresolved: {}", .report.issues.join("; "))]
    SchemaUnresolved { report: ValidationReport },

    /// The daily series is too short to forecast.
    #[error("insufficient history: need at least {needed} days, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// A single candidate model failed; it is excluded from the ensemble.
    #[error("model {model} failed: {reason}")]
    ModelFailure { model: String, reason: String },

    /// Every candidate model failed.
    #[error("forecast unavailable: {0}")]
    ForecastUnavailable(String),

    /// The insight collaborator did not answer in time.
    #[error("insight annotation timed out after {timeout_ms} ms")]
    AnnotationTimeout { timeout_ms: u64 },

    /// The insight collaborator returned an error or an unusable payload.
    #[error("insight annotation failed: {0}")]
    AnnotationFailed(String),

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for a model fit.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl AnalysisError {
    /// Whether the error aborts the request instead of being absorbed.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AnalysisError::ModelFailure { .. }
                | AnalysisError::AnnotationTimeout { .. }
                | AnalysisError::AnnotationFailed(_)
        )
    }
}
