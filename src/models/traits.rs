//! The candidate model interface and the registry the engine draws from.

use crate::core::{DailySeries, Forecast};
use crate::error::Result;

/// A forecasting model that can take part in the ensemble.
///
/// Models are fitted on a contiguous daily series and predict the days
/// directly after its last date. The trait is object-safe; the engine works
/// with [`BoxedForecaster`] values created fresh for every fit.
pub trait Forecaster {
    /// Fit on `series`, replacing any previous fit.
    fn fit(&mut self, series: &DailySeries) -> Result<()>;

    /// Point predictions for `horizon` days after the fitted series.
    ///
    /// Fails before the first successful [`fit`](Self::fit).
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    fn name(&self) -> &str;
}

/// Owned candidate model.
///
/// ```
/// use salescast::models::{BoxedForecaster, RecentAverage};
///
/// let model: BoxedForecaster = Box::new(RecentAverage::new());
/// assert_eq!(model.name(), "RecentAverage");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;

type Factory = Box<dyn Fn() -> BoxedForecaster + Send + Sync>;

/// A named recipe for one candidate model.
///
/// Each evaluation creates fresh instances, so a spec can be shared across
/// threads while the models themselves stay thread-local.
pub struct ModelSpec {
    /// Name reported in `models_used` and `models_excluded`.
    pub name: &'static str,
    factory: Factory,
}

impl ModelSpec {
    pub fn new<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> BoxedForecaster + Send + Sync + 'static,
    {
        Self {
            name,
            factory: Box::new(factory),
        }
    }

    /// Spec for a model parameterised by a window length in days.
    pub fn with_window<F>(name: &'static str, factory: F, window: usize) -> Self
    where
        F: Fn(usize) -> BoxedForecaster + Send + Sync + 'static,
    {
        Self::new(name, move || factory(window))
    }

    /// A new, unfitted instance.
    pub fn create(&self) -> BoxedForecaster {
        (self.factory)()
    }
}

impl std::fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ModelSpec").field(&self.name).finish()
    }
}

/// The candidate models of one engine, in evaluation order.
///
/// ```
/// use salescast::models::{ModelRegistry, ModelSpec, RecentAverage};
///
/// let registry = ModelRegistry::new()
///     .with(ModelSpec::new("RecentAverage", || Box::new(RecentAverage::new())));
///
/// assert_eq!(registry.names(), vec!["RecentAverage"]);
/// assert!(registry.specs()[0].create().predict(1).is_err());
/// ```
#[derive(Debug, Default)]
pub struct ModelRegistry {
    specs: Vec<ModelSpec>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: ModelSpec) {
        self.specs.push(spec);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, spec: ModelSpec) -> Self {
        self.register(spec);
        self
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[ModelSpec] {
        &self.specs
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.name).collect()
    }
}
