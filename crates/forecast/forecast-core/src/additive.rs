//! Additive trend + seasonality model
//!
//! `y(t) = trend(t) + seasonal(t) + noise`, where the trend is piecewise
//! linear with hinge changepoints and each seasonal component is a Fourier
//! series. Coefficients are found by penalised least squares:
//! intercept and slope are free, changepoint and seasonal coefficients are
//! shrunk towards zero with strengths set by their prior scales.
//!
//! ## When to Use
//!
//! - Utilisation series with daily/weekly cycles
//! - Short histories where a plain trend is enough (seasonality switches
//!   itself off until two full cycles are observed)

use crate::confidence::UncertaintyInterval;
use crate::seasonality::{select_seasonalities, Seasonality, SeasonalityConfig, SECONDS_PER_DAY};
use chrono::NaiveDateTime;
use forecast_spi::{ForecastBackend, ForecastError, Prediction, Result, TimeSeriesPoint};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Central width of the uncertainty interval
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.1;
/// Maximum number of trend changepoints
pub const DEFAULT_N_CHANGEPOINTS: usize = 25;
/// Share of the history in which changepoints are placed
pub const DEFAULT_CHANGEPOINT_RANGE: f64 = 0.8;
pub const DEFAULT_CHANGEPOINT_PRIOR_SCALE: f64 = 0.05;
pub const DEFAULT_SEASONALITY_PRIOR_SCALE: f64 = 10.0;

/// Fewest finite observations a fit accepts
pub const MIN_OBSERVATIONS: usize = 2;

/// Lower bound on the scaled noise variance used for penalties
const NOISE_VARIANCE_FLOOR: f64 = 1e-6;

/// Columns ahead of the changepoints: intercept, slope
const BASE_COLUMNS: usize = 2;

/// Configuration of the additive model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditiveModelConfig {
    pub interval_width: f64,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub seasonality: SeasonalityConfig,
}

impl Default for AdditiveModelConfig {
    fn default() -> Self {
        Self {
            interval_width: DEFAULT_INTERVAL_WIDTH,
            n_changepoints: DEFAULT_N_CHANGEPOINTS,
            changepoint_range: DEFAULT_CHANGEPOINT_RANGE,
            changepoint_prior_scale: DEFAULT_CHANGEPOINT_PRIOR_SCALE,
            seasonality_prior_scale: DEFAULT_SEASONALITY_PRIOR_SCALE,
            seasonality: SeasonalityConfig::default(),
        }
    }
}

impl AdditiveModelConfig {
    pub fn validate(&self) -> Result<()> {
        crate::confidence::z_score(self.interval_width)?;
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(invalid_parameter("changepoint_range", "must be in (0, 1]"));
        }
        if !(self.changepoint_prior_scale > 0.0 && self.changepoint_prior_scale.is_finite()) {
            return Err(invalid_parameter("changepoint_prior_scale", "must be positive"));
        }
        if !(self.seasonality_prior_scale > 0.0 && self.seasonality_prior_scale.is_finite()) {
            return Err(invalid_parameter("seasonality_prior_scale", "must be positive"));
        }
        Ok(())
    }
}

fn invalid_parameter(name: &str, reason: &str) -> ForecastError {
    ForecastError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Regressors shared by fitting and prediction
#[derive(Debug, Clone, PartialEq)]
struct Design {
    /// First history timestamp, epoch-like seconds
    start: i64,
    /// History span in seconds (> 0)
    span: f64,
    /// Changepoint locations on the scaled time axis
    changepoints: Vec<f64>,
    seasonalities: Vec<Seasonality>,
}

impl Design {
    fn width(&self) -> usize {
        BASE_COLUMNS
            + self.changepoints.len()
            + self.seasonalities.iter().map(Seasonality::width).sum::<usize>()
    }

    fn scaled_time(&self, secs: i64) -> f64 {
        (secs - self.start) as f64 / self.span
    }

    fn row(&self, secs: i64) -> Vec<f64> {
        let t = self.scaled_time(secs);
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&c| (t - c).max(0.0)));
        for seasonality in &self.seasonalities {
            seasonality.push_terms(secs as f64, &mut row);
        }
        row
    }

    fn matrix(&self, secs: &[i64]) -> DMatrix<f64> {
        DMatrix::from_row_iterator(secs.len(), self.width(), secs.iter().flat_map(|&s| self.row(s)))
    }

    /// Ridge strength per column
    fn penalties(&self, noise_variance: f64, config: &AdditiveModelConfig) -> Vec<f64> {
        let mut penalties = vec![0.0; BASE_COLUMNS];
        let changepoint = noise_variance / config.changepoint_prior_scale.powi(2);
        penalties.extend(std::iter::repeat(changepoint).take(self.changepoints.len()));
        let seasonal = noise_variance / config.seasonality_prior_scale.powi(2);
        let seasonal_columns = self.width() - penalties.len();
        penalties.extend(std::iter::repeat(seasonal).take(seasonal_columns));
        penalties
    }
}

/// Fitted state of an [`AdditiveModel`]
#[derive(Debug, Clone)]
pub struct AdditiveFit {
    design: Design,
    coefficients: DVector<f64>,
    /// Values were divided by this before fitting
    y_scale: f64,
    /// Last history timestamp, seconds
    end: i64,
    interval: UncertaintyInterval,
    n_observations: usize,
}

impl AdditiveFit {
    /// Names of the seasonal components that were fitted
    pub fn seasonalities(&self) -> Vec<&'static str> {
        self.design.seasonalities.iter().map(|s| s.name).collect()
    }

    pub fn n_changepoints(&self) -> usize {
        self.design.changepoints.len()
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Residual-based interval applied to predictions
    pub fn interval(&self) -> &UncertaintyInterval {
        &self.interval
    }

    /// Trend slope per second, in value units
    pub fn base_slope(&self) -> f64 {
        self.coefficients[1] * self.y_scale / self.design.span
    }

    fn point(&self, secs: i64) -> f64 {
        let row = DVector::from_vec(self.design.row(secs));
        row.dot(&self.coefficients) * self.y_scale
    }
}

/// Additive trend + seasonality forecasting backend
///
/// # Example
///
/// ```rust
/// use forecast_core::additive::AdditiveModel;
/// use forecast_core::{ForecastBackend, TimeSeriesPoint};
/// use chrono::{NaiveDate, TimeDelta};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let series: Vec<TimeSeriesPoint> = (0..50)
///     .map(|i| TimeSeriesPoint::new(start + TimeDelta::minutes(5 * i), 10.0 + i as f64))
///     .collect();
///
/// let backend = AdditiveModel::default();
/// let model = backend.fit(&series).unwrap();
/// let next = start + TimeDelta::minutes(5 * 50);
/// let predictions = backend.predict(&model, &[next]).unwrap();
/// assert!((predictions[0].yhat - 60.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdditiveModel {
    config: AdditiveModelConfig,
}

impl AdditiveModel {
    pub fn new(config: AdditiveModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AdditiveModelConfig {
        &self.config
    }

    /// Hinge locations spread evenly over the leading share of the history
    fn changepoints(&self, scaled: &[f64]) -> Vec<f64> {
        let n = scaled.len();
        let history = ((n as f64) * self.config.changepoint_range).floor() as usize;
        let count = self.config.n_changepoints.min(history.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }
        let last = (history - 1) as f64;
        (1..=count)
            .map(|i| {
                let index = (last * i as f64 / count as f64).round() as usize;
                scaled[index]
            })
            .collect()
    }
}

/// Mean squared residual of an ordinary linear fit of `y` on `t`
fn linear_noise_variance(t: &[f64], y: &[f64]) -> f64 {
    let n = t.len() as f64;
    let mean_t = t.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let s_tt: f64 = t.iter().map(|x| (x - mean_t).powi(2)).sum();
    let s_ty: f64 = t.iter().zip(y).map(|(x, v)| (x - mean_t) * (v - mean_y)).sum();
    let slope = if s_tt > 0.0 { s_ty / s_tt } else { 0.0 };
    let intercept = mean_y - slope * mean_t;
    t.iter()
        .zip(y)
        .map(|(x, v)| (v - intercept - slope * x).powi(2))
        .sum::<f64>()
        / n
}

fn seconds(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp()
}

impl ForecastBackend for AdditiveModel {
    type Model = AdditiveFit;

    fn fit(&self, series: &[TimeSeriesPoint]) -> Result<AdditiveFit> {
        let mut points: Vec<(i64, f64)> = series
            .iter()
            .filter(|p| p.value.is_finite())
            .map(|p| (seconds(&p.timestamp), p.value))
            .collect();
        if points.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: points.len(),
            });
        }
        points.sort_by_key(|&(secs, _)| secs);

        let start = points[0].0;
        let end = points[points.len() - 1].0;
        if end == start {
            return Err(ForecastError::ModelFit(
                "all observations share one timestamp".to_string(),
            ));
        }
        let span = (end - start) as f64;

        let y_scale = points
            .iter()
            .map(|&(_, v)| v.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let secs: Vec<i64> = points.iter().map(|&(s, _)| s).collect();
        let y: Vec<f64> = points.iter().map(|&(_, v)| v / y_scale).collect();
        let scaled: Vec<f64> = secs.iter().map(|&s| (s - start) as f64 / span).collect();

        let min_spacing = secs
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|&gap| gap > 0)
            .min()
            .unwrap_or(0) as f64;

        let design = Design {
            start,
            span,
            changepoints: self.changepoints(&scaled),
            seasonalities: select_seasonalities(
                &self.config.seasonality,
                span / SECONDS_PER_DAY,
                min_spacing / SECONDS_PER_DAY,
            ),
        };

        let noise_variance = linear_noise_variance(&scaled, &y).max(NOISE_VARIANCE_FLOOR);
        let x = design.matrix(&secs);
        let target = DVector::from_vec(y);

        let xt = x.transpose();
        let mut normal = &xt * &x;
        for (i, penalty) in design.penalties(noise_variance, &self.config).into_iter().enumerate() {
            normal[(i, i)] += penalty;
        }
        let rhs = &xt * &target;

        let cholesky = normal.cholesky().ok_or_else(|| {
            ForecastError::ModelFit("normal equations are not positive definite".to_string())
        })?;
        let coefficients = cholesky.solve(&rhs);
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ModelFit(
                "coefficients are not finite".to_string(),
            ));
        }

        let fitted = &x * &coefficients;
        let residuals: Vec<f64> = target
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| (y - f) * y_scale)
            .collect();
        let interval = UncertaintyInterval::from_residuals(&residuals, self.config.interval_width)?;

        Ok(AdditiveFit {
            design,
            coefficients,
            y_scale,
            end,
            interval,
            n_observations: points.len(),
        })
    }

    fn predict(&self, model: &AdditiveFit, timestamps: &[NaiveDateTime]) -> Result<Vec<Prediction>> {
        timestamps
            .iter()
            .map(|ts| {
                let secs = seconds(ts);
                let yhat = model.point(secs);
                if !yhat.is_finite() {
                    return Err(ForecastError::ModelFit(format!(
                        "prediction at {} is not finite",
                        ts
                    )));
                }
                let horizon = (secs - model.end).max(0) as f64 / model.design.span;
                let (yhat_lower, yhat_upper) = model.interval.bounds(yhat, horizon);
                Ok(Prediction {
                    timestamp: *ts,
                    yhat,
                    yhat_lower,
                    yhat_upper,
                })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "additive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seasonality::Toggle;
    use chrono::{NaiveDate, TimeDelta};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(n: i64, step_minutes: i64, f: impl Fn(i64) -> f64) -> Vec<TimeSeriesPoint> {
        (0..n)
            .map(|i| TimeSeriesPoint::new(start() + TimeDelta::minutes(step_minutes * i), f(i)))
            .collect()
    }

    #[test]
    fn test_linear_trend_is_recovered() {
        let data = series(100, 5, |i| 10.0 + 0.5 * i as f64);
        let backend = AdditiveModel::default();
        let model = backend.fit(&data).unwrap();

        let future: Vec<_> = (100..110).map(|i| start() + TimeDelta::minutes(5 * i)).collect();
        let predictions = backend.predict(&model, &future).unwrap();
        for (i, p) in (100..110).zip(&predictions) {
            let expected = 10.0 + 0.5 * i as f64;
            assert!((p.yhat - expected).abs() < 1e-3, "{} vs {}", p.yhat, expected);
        }
        assert!((model.base_slope() - 0.5 / 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_contain_point_estimate() {
        let data = series(200, 5, |i| 50.0 + 10.0 * ((i as f64) * 0.3).sin() + (i % 7) as f64);
        let backend = AdditiveModel::default();
        let model = backend.fit(&data).unwrap();

        let timestamps: Vec<_> = (0..400).map(|i| start() + TimeDelta::minutes(5 * i)).collect();
        for p in backend.predict(&model, &timestamps).unwrap() {
            assert!(p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper);
        }
    }

    #[test]
    fn test_future_interval_is_wider() {
        let data = series(100, 5, |i| 20.0 + (i % 5) as f64);
        let backend = AdditiveModel::default();
        let model = backend.fit(&data).unwrap();

        let near = start() + TimeDelta::minutes(5 * 99);
        let far = start() + TimeDelta::minutes(5 * 500);
        let predictions = backend.predict(&model, &[near, far]).unwrap();
        assert!(predictions[1].width() > predictions[0].width());
    }

    #[test]
    fn test_daily_seasonality_is_learned() {
        // Four days of hourly data with a daily cycle
        let data = series(96, 60, |i| {
            100.0 + 20.0 * (2.0 * std::f64::consts::PI * (i % 24) as f64 / 24.0).sin()
        });
        let backend = AdditiveModel::default();
        let model = backend.fit(&data).unwrap();
        assert_eq!(model.seasonalities(), vec!["daily"]);

        // Same hour one day later should match the observed cycle
        let peak = start() + TimeDelta::hours(96 + 6);
        let trough = start() + TimeDelta::hours(96 + 18);
        let predictions = backend.predict(&model, &[peak, trough]).unwrap();
        assert!((predictions[0].yhat - 120.0).abs() < 1.0, "peak {}", predictions[0].yhat);
        assert!((predictions[1].yhat - 80.0).abs() < 1.0, "trough {}", predictions[1].yhat);
    }

    #[test]
    fn test_seasonality_can_be_disabled() {
        let config = AdditiveModelConfig {
            seasonality: SeasonalityConfig {
                daily: Toggle::Off,
                ..SeasonalityConfig::default()
            },
            ..AdditiveModelConfig::default()
        };
        let data = series(96, 60, |i| (i % 24) as f64);
        let model = AdditiveModel::new(config).unwrap().fit(&data).unwrap();
        assert!(model.seasonalities().is_empty());
    }

    #[test]
    fn test_changepoint_count() {
        let backend = AdditiveModel::default();
        let model = backend.fit(&series(100, 5, |i| i as f64)).unwrap();
        assert_eq!(model.n_changepoints(), DEFAULT_N_CHANGEPOINTS);

        let model = backend.fit(&series(5, 5, |i| i as f64)).unwrap();
        assert_eq!(model.n_changepoints(), 3);

        let model = backend.fit(&series(2, 5, |i| i as f64)).unwrap();
        assert_eq!(model.n_changepoints(), 0);
    }

    #[test]
    fn test_insufficient_data() {
        let backend = AdditiveModel::default();
        let err = backend.fit(&series(1, 5, |_| 1.0)).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let mut data = series(3, 5, |i| i as f64);
        data[1].value = f64::NAN;
        let model = AdditiveModel::default().fit(&data).unwrap();
        assert_eq!(model.n_observations(), 2);

        data[0].value = f64::INFINITY;
        assert!(AdditiveModel::default().fit(&data).is_err());
    }

    #[test]
    fn test_single_timestamp_is_degenerate() {
        let data = vec![
            TimeSeriesPoint::new(start(), 1.0),
            TimeSeriesPoint::new(start(), 2.0),
        ];
        let err = AdditiveModel::default().fit(&data).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit(_)));
    }

    #[test]
    fn test_unsorted_input_matches_sorted() {
        let data = series(60, 5, |i| 3.0 * i as f64 + (i % 4) as f64);
        let mut shuffled = data.clone();
        shuffled.reverse();

        let backend = AdditiveModel::default();
        let a = backend.fit(&data).unwrap();
        let b = backend.fit(&shuffled).unwrap();
        let at = [start() + TimeDelta::minutes(5 * 70)];
        let pa = backend.predict(&a, &at).unwrap();
        let pb = backend.predict(&b, &at).unwrap();
        assert!((pa[0].yhat - pb[0].yhat).abs() < 1e-9);
    }

    #[test]
    fn test_constant_zero_series() {
        let model = AdditiveModel::default().fit(&series(10, 5, |_| 0.0)).unwrap();
        let p = AdditiveModel::default()
            .predict(&model, &[start() + TimeDelta::hours(2)])
            .unwrap();
        assert!(p[0].yhat.abs() < 1e-9);
        assert_eq!(p[0].width(), 0.0);
    }

    #[test]
    fn test_config_validation() {
        let bad = AdditiveModelConfig {
            interval_width: 1.2,
            ..AdditiveModelConfig::default()
        };
        assert!(AdditiveModel::new(bad).is_err());

        let bad = AdditiveModelConfig {
            changepoint_range: 0.0,
            ..AdditiveModelConfig::default()
        };
        assert!(AdditiveModel::new(bad).is_err());
    }
}
