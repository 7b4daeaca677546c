//! Server configuration from the environment
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `50051` |
//! | `WORKERS` | `10` |
//! | `RIGHTSIZING_QUANTILE` | `95` |
//! | `RIGHTSIZING_MARGIN` | `0.2` |
//! | `FORECAST_UTC_OFFSET` | process-local zone |
//! | `FORECAST_HORIZON` | `1440` |
//! | `FORECAST_WINDOW_HOURS` | `6` |
//! | `FORECAST_FREQUENCY` | `5min` |
//! | `FORECAST_INTERVAL_WIDTH` | `0.1` |

use forecast_facade::{ForecastConfig, ForecastError, Zone};
use rightsizing::{RightsizingError, DEFAULT_MARGIN, DEFAULT_QUANTILE};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 50051;
/// Async worker threads and blocking compute threads
pub const DEFAULT_WORKERS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name}='{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("forecast configuration: {0}")]
    Forecast(#[from] ForecastError),

    #[error("rightsizing configuration: {0}")]
    Rightsizing(#[from] RightsizingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Quantile for rightsizing requests that name none
    pub quantile: u32,
    pub margin: f64,
    pub forecast: ForecastConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            quantile: DEFAULT_QUANTILE,
            margin: DEFAULT_MARGIN,
            forecast: ForecastConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = parsed(&lookup, "PORT")? {
            config.port = port;
        }
        if let Some(workers) = parsed(&lookup, "WORKERS")? {
            config.workers = workers;
        }
        if let Some(quantile) = parsed(&lookup, "RIGHTSIZING_QUANTILE")? {
            config.quantile = quantile;
        }
        if let Some(margin) = parsed(&lookup, "RIGHTSIZING_MARGIN")? {
            config.margin = margin;
        }

        let forecast = &mut config.forecast;
        if let Some(offset) = lookup("FORECAST_UTC_OFFSET") {
            forecast.zone = Zone::parse(&offset)?;
        }
        if let Some(horizon) = parsed(&lookup, "FORECAST_HORIZON")? {
            forecast.engine.horizon = horizon;
        }
        if let Some(hours) = parsed(&lookup, "FORECAST_WINDOW_HOURS")? {
            forecast.engine.window_hours = hours;
        }
        if let Some(frequency) = lookup("FORECAST_FREQUENCY") {
            forecast.engine.default_frequency = frequency;
        }
        if let Some(width) = parsed(&lookup, "FORECAST_INTERVAL_WIDTH")? {
            forecast.model.interval_width = width;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                name: "WORKERS",
                value: self.workers.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.quantile > 100 {
            return Err(RightsizingError::QuantileOutOfRange {
                quantile: f64::from(self.quantile),
            }
            .into());
        }
        rightsizing::PercentileEstimator::with_margin(self.margin)?;
        self.forecast.validate()?;
        self.addr()?;
        Ok(())
    }

    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e| ConfigError::Invalid {
            name: "HOST",
            value: addr,
            reason: format!("{}", e),
        })
    }
}

fn parsed<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => {
            let result = value.trim().parse::<T>();
            match result {
                Ok(parsed) => Ok(Some(parsed)),
                Err(e) => Err(ConfigError::Invalid {
                    name,
                    value,
                    reason: e.to_string(),
                }),
            }
        }
    }
}
