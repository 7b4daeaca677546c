//! Forecast Service Provider Interface
//!
//! Defines the backend and clock contracts, the error type and the data
//! model shared by the forecast engine and its callers.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Clock, ForecastBackend};
pub use error::{ForecastError, Result};
pub use model::{ForecastResult, NamedSeries, Prediction, SeriesKind, TimeSeriesPoint};
