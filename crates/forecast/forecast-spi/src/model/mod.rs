//! Model module containing data structures

mod forecast_result;
mod prediction;
mod time_series_point;

pub use forecast_result::{ForecastResult, NamedSeries, SeriesKind};
pub use prediction::Prediction;
pub use time_series_point::TimeSeriesPoint;
