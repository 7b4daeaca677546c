//! Fourier seasonality terms
//!
//! Each seasonal component is a partial Fourier series over a fixed period,
//! evaluated on absolute days since the epoch so that cycles line up with
//! the calendar rather than with the start of the history.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whether a seasonal component is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// Decide from the history span and spacing
    #[default]
    Auto,
    On,
    Off,
}

/// Seasonal components to consider when fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalityConfig {
    pub daily: Toggle,
    pub weekly: Toggle,
    pub yearly: Toggle,
}

/// A seasonal component: period in days and Fourier order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seasonality {
    pub name: &'static str,
    pub period_days: f64,
    pub order: usize,
}

pub const DAILY: Seasonality = Seasonality {
    name: "daily",
    period_days: 1.0,
    order: 4,
};

pub const WEEKLY: Seasonality = Seasonality {
    name: "weekly",
    period_days: 7.0,
    order: 3,
};

pub const YEARLY: Seasonality = Seasonality {
    name: "yearly",
    period_days: 365.25,
    order: 10,
};

impl Seasonality {
    /// Number of regression columns (a sine and a cosine per order)
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Append `sin(2πkx/P), cos(2πkx/P)` for `k = 1..=order`.
    pub fn push_terms(&self, epoch_secs: f64, row: &mut Vec<f64>) {
        let days = epoch_secs / SECONDS_PER_DAY;
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * days / self.period_days;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }

    /// Auto rule: at least two full cycles of history, sampled more finely
    /// than the period itself.
    fn auto_enabled(&self, span_days: f64, min_spacing_days: f64) -> bool {
        span_days >= 2.0 * self.period_days && min_spacing_days < self.period_days
    }
}

/// Pick the seasonal components for a history.
///
/// `min_spacing_days` is the smallest positive gap between observations.
pub fn select_seasonalities(
    config: &SeasonalityConfig,
    span_days: f64,
    min_spacing_days: f64,
) -> Vec<Seasonality> {
    [
        (config.daily, DAILY),
        (config.weekly, WEEKLY),
        (config.yearly, YEARLY),
    ]
    .into_iter()
    .filter(|(toggle, seasonality)| match toggle {
        Toggle::On => true,
        Toggle::Off => false,
        Toggle::Auto => seasonality.auto_enabled(span_days, min_spacing_days),
    })
    .map(|(_, seasonality)| seasonality)
    .collect()
}
