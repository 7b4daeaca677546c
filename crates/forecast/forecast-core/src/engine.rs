//! Forecast orchestration
//!
//! Fits a [`ForecastBackend`] on the history, predicts the history plus a
//! fixed number of future steps, and keeps only the predictions that fall in
//! the window starting at the clock's current time.

use crate::frequency::{median_spacing, parse_frequency};
use chrono::{NaiveDateTime, TimeDelta};
use forecast_spi::{Clock, ForecastBackend, ForecastError, ForecastResult, Result, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Future steps generated past the last observation
pub const DEFAULT_HORIZON: usize = 1440;
/// Hours kept after `now`
pub const DEFAULT_WINDOW_HOURS: u32 = 6;
/// Sampling frequency assumed when a request names none
pub const DEFAULT_FREQUENCY: &str = "5min";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub horizon: usize,
    pub window_hours: u32,
    pub default_frequency: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            window_hours: DEFAULT_WINDOW_HOURS,
            default_frequency: DEFAULT_FREQUENCY.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter {
                name: "horizon".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        self.window()?;
        parse_frequency(&self.default_frequency)?;
        Ok(())
    }

    /// Window length as a duration
    pub fn window(&self) -> Result<TimeDelta> {
        match TimeDelta::try_hours(i64::from(self.window_hours)) {
            Some(window) if self.window_hours > 0 => Ok(window),
            _ => Err(ForecastError::InvalidParameter {
                name: "window_hours".to_string(),
                reason: "must be at least 1".to_string(),
            }),
        }
    }
}

/// Forecasts a series with a backend and a clock
pub struct ForecastEngine<B: ForecastBackend> {
    backend: B,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    default_step: TimeDelta,
    window: TimeDelta,
}

impl<B: ForecastBackend> ForecastEngine<B> {
    pub fn new(backend: B, clock: Arc<dyn Clock>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let default_step = parse_frequency(&config.default_frequency)?;
        let window = config.window()?;
        Ok(Self {
            backend,
            clock,
            config,
            default_step,
            window,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast `series` and keep the `[now, now + window]` part.
    ///
    /// `frequency` sets the step between generated future timestamps; it
    /// defaults to the configured frequency. The clock is read only once the
    /// model has been fitted and evaluated.
    pub fn forecast(
        &self,
        series: &[TimeSeriesPoint],
        frequency: Option<&str>,
    ) -> Result<ForecastResult> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput("empty time series".to_string()));
        }
        let step = match frequency {
            Some(f) => parse_frequency(f)?,
            None => self.default_step,
        };

        let model = self.backend.fit(series)?;

        let timeline = self.timeline(series, step)?;
        let predictions = self.backend.predict(&model, &timeline)?;

        let now = self.clock.now();
        let until = now.checked_add_signed(self.window).unwrap_or(NaiveDateTime::MAX);
        let kept: Vec<_> = predictions
            .into_iter()
            .filter(|p| p.timestamp >= now && p.timestamp <= until)
            .collect();

        debug!(
            backend = self.backend.name(),
            observations = series.len(),
            predicted = timeline.len(),
            kept = kept.len(),
            %now,
            "forecast complete"
        );
        Ok(ForecastResult::from_predictions(&kept))
    }

    /// Unique sorted history timestamps followed by `horizon` future steps
    fn timeline(&self, series: &[TimeSeriesPoint], step: TimeDelta) -> Result<Vec<NaiveDateTime>> {
        let mut timeline: Vec<NaiveDateTime> = series.iter().map(|p| p.timestamp).collect();
        timeline.sort();
        timeline.dedup();

        if let Some(spacing) = median_spacing(&timeline) {
            if spacing != step {
                debug!(
                    spacing_secs = spacing.num_seconds(),
                    step_secs = step.num_seconds(),
                    "history spacing differs from forecast frequency"
                );
            }
        }

        let mut current = *timeline.last().ok_or_else(|| {
            ForecastError::InvalidInput("empty time series".to_string())
        })?;
        timeline.reserve(self.config.horizon);
        for _ in 0..self.config.horizon {
            current = current.checked_add_signed(step).ok_or_else(|| {
                ForecastError::InvalidTimestamp(format!(
                    "forecast horizon runs past {}",
                    current
                ))
            })?;
            timeline.push(current);
        }
        Ok(timeline)
    }
}
