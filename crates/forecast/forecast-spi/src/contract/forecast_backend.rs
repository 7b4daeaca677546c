//! Trait for pluggable statistical forecasting backends

use crate::error::Result;
use crate::model::{Prediction, TimeSeriesPoint};
use chrono::NaiveDateTime;

/// A statistical model that can be fitted to a series and evaluated at
/// arbitrary timestamps.
///
/// The engine only orchestrates fit, timeline extension and windowing, so
/// any backend that honours this contract can be swapped in.
///
/// # Example
///
/// ```rust,ignore
/// use forecast_spi::ForecastBackend;
///
/// fn evaluate<B: ForecastBackend>(backend: &B, series: &[TimeSeriesPoint]) -> Result<Vec<Prediction>> {
///     let model = backend.fit(series)?;
///     let timestamps: Vec<_> = series.iter().map(|p| p.timestamp).collect();
///     backend.predict(&model, &timestamps)
/// }
/// ```
pub trait ForecastBackend: Send + Sync {
    /// Fitted state produced by [`ForecastBackend::fit`]
    type Model: Send;

    /// Fit the model to historical observations.
    ///
    /// Points arrive in input order; timestamps may repeat.
    fn fit(&self, series: &[TimeSeriesPoint]) -> Result<Self::Model>;

    /// Predict at each timestamp, returning one row per timestamp in the
    /// same order.
    fn predict(&self, model: &Self::Model, timestamps: &[NaiveDateTime])
        -> Result<Vec<Prediction>>;

    /// Name of this backend
    fn name(&self) -> &str;
}
