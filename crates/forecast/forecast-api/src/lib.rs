//! Forecast Consumer API
//!
//! Consumer configuration and builder API for the forecast engine.
//!
//! This crate provides:
//! - [`ForecastConfig`], the serde-configurable settings of the whole stack
//! - Builders producing a ready [`ForecastEngine`] over the additive model
//! - Re-exports from SPI and core for convenience

use std::sync::Arc;

// Re-export from core
pub use forecast_core::{
    additive, confidence, engine, frequency, seasonality, time, AdditiveFit, AdditiveModel,
    AdditiveModelConfig, EngineConfig, FixedClock, ForecastEngine, SeasonalityConfig,
    SystemClock, Toggle, UncertaintyInterval, Zone, DEFAULT_FREQUENCY, DEFAULT_HORIZON,
    DEFAULT_INTERVAL_WIDTH, DEFAULT_WINDOW_HOURS,
};

// Re-export traits from SPI
pub use forecast_spi::{
    Clock, ForecastBackend, ForecastError, ForecastResult, NamedSeries, Prediction, Result,
    SeriesKind, TimeSeriesPoint,
};

use serde::{Deserialize, Serialize};

/// Engine built by this crate
pub type DefaultEngine = ForecastEngine<AdditiveModel>;

/// Configuration for the forecast stack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Horizon, window and default frequency
    pub engine: EngineConfig,
    /// Additive model settings, including the interval width
    pub model: AdditiveModelConfig,
    /// Zone of the wall clock
    pub zone: Zone,
}

impl ForecastConfig {
    /// Check every section without building anything
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.model.validate()
    }

    /// Engine reading the system clock in the configured zone
    pub fn build(&self) -> Result<DefaultEngine> {
        self.build_with_clock(Arc::new(SystemClock::new(self.zone)))
    }

    /// Engine reading an explicit clock
    pub fn build_with_clock(&self, clock: Arc<dyn Clock>) -> Result<DefaultEngine> {
        let backend = AdditiveModel::new(self.model.clone())?;
        ForecastEngine::new(backend, clock, self.engine.clone())
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{DefaultEngine, ForecastConfig};
    pub use forecast_core::{
        AdditiveModel, AdditiveModelConfig, EngineConfig, ForecastEngine, SystemClock, Zone,
    };
    pub use forecast_spi::{
        Clock, ForecastBackend, ForecastError, ForecastResult, Result, SeriesKind,
        TimeSeriesPoint,
    };
}
