//! Core data structures: uploaded tables, daily series and forecasts.

mod forecast;
mod table;
mod time_series;

pub use forecast::Forecast;
pub use table::{Cell, RawTable};
pub use time_series::{is_weekend, DailySeries, GapFill};
