//! Forecast error types

use thiserror::Error;

/// Errors that can occur during forecasting operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Malformed or empty input series
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Too few usable observations to fit a model
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Frequency string could not be turned into a positive step
    #[error("Invalid frequency '{0}'")]
    InvalidFrequency(String),

    /// Timestamp cannot be represented in the configured zone
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The backend could not fit or evaluate the model
    #[error("Model fit failed: {0}")]
    ModelFit(String),
}

impl ForecastError {
    /// True for errors caused by the caller's data rather than the model.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, ForecastError::ModelFit(_))
    }
}
