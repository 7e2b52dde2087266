//! Candidate forecasting models and their ensemble combination.

mod traits;

pub mod baseline;
pub mod boosting;
pub mod decomposition;
pub mod ensemble;
pub mod smoothing;

pub use baseline::RecentAverage;
pub use boosting::BoostedLags;
pub use decomposition::SeasonalTrend;
pub use ensemble::{Ensemble, Weighting};
pub use smoothing::DampedHolt;
pub use traits::{BoxedForecaster, Forecaster, ModelRegistry, ModelSpec};

/// The standard candidate set: decomposition, boosted lags, damped
/// smoothing and the recent-average baseline.
pub fn default_candidates() -> ModelRegistry {
    ModelRegistry::new()
        .with(ModelSpec::new("SeasonalTrend", || {
            Box::new(SeasonalTrend::new())
        }))
        .with(ModelSpec::new("BoostedLags", || Box::new(BoostedLags::new())))
        .with(ModelSpec::new("DampedHolt", || Box::new(DampedHolt::new())))
        .with(ModelSpec::with_window(
            "RecentAverage",
            |w| Box::new(RecentAverage::with_window(w)),
            7,
        ))
}
