//! Forecast Core
//!
//! Core implementations for the forecast engine: the additive trend +
//! seasonality backend, frequency parsing, calendar time handling and
//! uncertainty intervals.

pub mod additive;
pub mod confidence;
pub mod engine;
pub mod frequency;
pub mod seasonality;
pub mod time;

// Re-export SPI traits for implementations
pub use forecast_spi::{
    Clock, ForecastBackend, ForecastError, ForecastResult, NamedSeries, Prediction, Result,
    SeriesKind, TimeSeriesPoint,
};

// Re-export main types
pub use additive::{AdditiveFit, AdditiveModel, AdditiveModelConfig, DEFAULT_INTERVAL_WIDTH};
pub use confidence::UncertaintyInterval;
pub use engine::{
    EngineConfig, ForecastEngine, DEFAULT_FREQUENCY, DEFAULT_HORIZON, DEFAULT_WINDOW_HOURS,
};
pub use frequency::parse_frequency;
pub use seasonality::{SeasonalityConfig, Toggle};
pub use time::{format_datetime, parse_datetime, FixedClock, SystemClock, Zone};
