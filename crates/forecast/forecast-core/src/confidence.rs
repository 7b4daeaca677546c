//! Uncertainty interval implementations
//!
//! Bounds are derived from the spread of in-sample residuals and widen with
//! the distance past the end of the history.

use forecast_spi::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Symmetric interval `yhat ± z * sigma * sqrt(1 + h)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyInterval {
    /// Central width of the interval (0.1 keeps the middle 10%)
    pub interval_width: f64,
    /// Standard-normal quantile for the width
    pub z: f64,
    /// Residual standard deviation, in value units
    pub sigma: f64,
}

impl UncertaintyInterval {
    /// Create from residual standard deviation
    pub fn new(sigma: f64, interval_width: f64) -> Result<Self> {
        Ok(Self {
            interval_width,
            z: z_score(interval_width)?,
            sigma,
        })
    }

    /// Create from historical residuals
    pub fn from_residuals(residuals: &[f64], interval_width: f64) -> Result<Self> {
        Self::new(residual_std(residuals), interval_width)
    }

    /// Lower and upper bound around `yhat`.
    ///
    /// `horizon` is the distance past the end of the history measured in
    /// history spans; it is 0 in-sample.
    pub fn bounds(&self, yhat: f64, horizon: f64) -> (f64, f64) {
        let half_width = self.z * self.sigma * (1.0 + horizon.max(0.0)).sqrt();
        (yhat - half_width, yhat + half_width)
    }
}

/// Standard-normal quantile at `0.5 + interval_width / 2`
pub fn z_score(interval_width: f64) -> Result<f64> {
    if !(interval_width > 0.0 && interval_width < 1.0) {
        return Err(ForecastError::InvalidParameter {
            name: "interval_width".to_string(),
            reason: format!("must be in (0, 1), got {}", interval_width),
        });
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ModelFit(format!("standard normal unavailable: {}", e)))?;
    Ok(normal.inverse_cdf(0.5 + interval_width / 2.0))
}

/// Population standard deviation; 0 for fewer than two residuals
pub fn residual_std(residuals: &[f64]) -> f64 {
    if residuals.len() < 2 {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_score_values() {
        assert!((z_score(0.95).unwrap() - 1.959964).abs() < 1e-4);
        assert!((z_score(0.8).unwrap() - 1.281552).abs() < 1e-4);
        // Narrow 10% interval: 45th to 55th percentile
        assert!((z_score(0.1).unwrap() - 0.125661).abs() < 1e-4);
    }

    #[test]
    fn test_z_score_rejects_bad_width() {
        for width in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(z_score(width).is_err(), "accepted {}", width);
        }
    }

    #[test]
    fn test_from_residuals() {
        let residuals = vec![-2.0, 1.0, -1.0, 2.0, 0.0];
        let interval = UncertaintyInterval::from_residuals(&residuals, 0.95).unwrap();
        assert!((interval.sigma - 2.0_f64.sqrt()).abs() < 1e-12);

        let (lower, upper) = interval.bounds(100.0, 0.0);
        assert!(lower < 100.0 && upper > 100.0);
        assert!(((100.0 - lower) - (upper - 100.0)).abs() < 1e-12);
    }

    #[test]
    fn test_interval_widens_with_horizon() {
        let interval = UncertaintyInterval::new(1.0, 0.9).unwrap();
        let (l0, u0) = interval.bounds(0.0, 0.0);
        let (l1, u1) = interval.bounds(0.0, 0.5);
        let (l2, u2) = interval.bounds(0.0, 1.0);
        assert!(u1 - l1 > u0 - l0);
        assert!(u2 - l2 > u1 - l1);
    }

    #[test]
    fn test_zero_sigma_collapses() {
        let interval = UncertaintyInterval::new(0.0, 0.1).unwrap();
        assert_eq!(interval.bounds(5.0, 3.0), (5.0, 5.0));
    }

    #[test]
    fn test_residual_std_short_input() {
        assert_eq!(residual_std(&[]), 0.0);
        assert_eq!(residual_std(&[3.0]), 0.0);
    }
}
