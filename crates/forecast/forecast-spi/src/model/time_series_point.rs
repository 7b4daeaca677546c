//! Time series observation model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single observation: local calendar time and a value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Local calendar time, whole seconds
    pub timestamp: NaiveDateTime,
    /// Observed value
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}
