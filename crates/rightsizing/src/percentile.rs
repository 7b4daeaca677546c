//! Percentile estimation
//!
//! Linear interpolation between closest ranks: for `n` sorted samples the
//! `q`-th percentile sits at rank `q / 100 * (n - 1)`.

use crate::error::{Result, RightsizingError};
use serde::{Deserialize, Serialize};

/// Headroom added on top of the percentile
pub const DEFAULT_MARGIN: f64 = 0.2;
/// Percentile used when a request names none
pub const DEFAULT_QUANTILE: u32 = 95;

/// Interpolated `quantile`-th percentile of `values` (`0..=100`).
pub fn percentile(values: &[f64], quantile: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(RightsizingError::EmptySampleSet);
    }
    if !(0.0..=100.0).contains(&quantile) {
        return Err(RightsizingError::QuantileOutOfRange { quantile });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(RightsizingError::NonFiniteSample { index });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = quantile / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let fraction = rank - lower as f64;
    let (low, high) = (sorted[lower], sorted[upper]);
    let spread = high - low;
    let value = if spread.is_finite() {
        low + fraction * spread
    } else {
        // Spread overflows near f64::MAX
        low * (1.0 - fraction) + high * fraction
    };
    finite(value)
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RightsizingError::NonFiniteResult)
    }
}

/// Percentile-plus-margin recommender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EstimatorSettings")]
pub struct PercentileEstimator {
    margin: f64,
}

/// Deserialized form, checked by [`PercentileEstimator::with_margin`]
#[derive(Deserialize)]
struct EstimatorSettings {
    #[serde(default = "default_margin")]
    margin: f64,
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

impl TryFrom<EstimatorSettings> for PercentileEstimator {
    type Error = RightsizingError;

    fn try_from(settings: EstimatorSettings) -> Result<Self> {
        Self::with_margin(settings.margin)
    }
}

impl Default for PercentileEstimator {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
        }
    }
}

impl PercentileEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator with a custom margin (`0.2` adds 20%)
    pub fn with_margin(margin: f64) -> Result<Self> {
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(RightsizingError::InvalidMargin { margin });
        }
        Ok(Self { margin })
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// `percentile(values, quantile) * (1 + margin)`
    pub fn estimate(&self, values: &[f64], quantile: u32) -> Result<f64> {
        if quantile > 100 {
            return Err(RightsizingError::QuantileOutOfRange {
                quantile: f64::from(quantile),
            });
        }
        let raw = percentile(values, f64::from(quantile))?;
        finite(raw * (1.0 + self.margin))
    }

    /// Estimate at [`DEFAULT_QUANTILE`]
    pub fn recommend(&self, values: &[f64]) -> Result<f64> {
        self.estimate(values, DEFAULT_QUANTILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&values, 95.0).unwrap() - 4.8).abs() < 1e-12);
        assert_eq!(percentile(&values, 50.0).unwrap(), 3.0);
        assert_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&values, 100.0).unwrap(), 5.0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = percentile(&[5.0, 1.0, 4.0, 2.0, 3.0], 95.0).unwrap();
        let b = percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 95.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(percentile(&[7.5], 95.0).unwrap(), 7.5);
        let estimate = PercentileEstimator::default().estimate(&[10.0], 95).unwrap();
        assert!((estimate - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_applies_margin() {
        let estimate = PercentileEstimator::default()
            .estimate(&[1.0, 2.0, 3.0, 4.0, 5.0], 95)
            .unwrap();
        assert!((estimate - 5.76).abs() < 1e-9);
    }

    #[test]
    fn test_custom_margin() {
        let estimator = PercentileEstimator::with_margin(0.0).unwrap();
        assert_eq!(estimator.estimate(&[1.0, 3.0], 50).unwrap(), 2.0);
        assert!(PercentileEstimator::with_margin(-0.1).is_err());
        assert!(PercentileEstimator::with_margin(f64::NAN).is_err());
    }

    #[test]
    fn test_errors() {
        let estimator = PercentileEstimator::default();
        assert_eq!(estimator.estimate(&[], 95), Err(RightsizingError::EmptySampleSet));
        assert_eq!(
            estimator.estimate(&[1.0], 101),
            Err(RightsizingError::QuantileOutOfRange { quantile: 101.0 })
        );
        assert_eq!(
            estimator.estimate(&[1.0, f64::NAN], 95),
            Err(RightsizingError::NonFiniteSample { index: 1 })
        );
        assert!(percentile(&[1.0], -1.0).is_err());
    }

    #[test]
    fn test_huge_samples_interpolate() {
        let values = [1.0e308, 1.7e308];
        let value = percentile(&values, 95.0).unwrap();
        assert!(value.is_finite());
        assert!(value > 1.6e308 && value < 1.7e308);
        assert_eq!(percentile(&[-1.7e308, 1.7e308], 50.0).unwrap(), 0.0);
    }

    #[test]
    fn test_margin_overflow_is_rejected() {
        let estimator = PercentileEstimator::default();
        assert_eq!(
            estimator.estimate(&[1.0e308, 1.7e308], 95),
            Err(RightsizingError::NonFiniteResult)
        );
        let exact = PercentileEstimator::with_margin(0.0).unwrap();
        assert!(exact.estimate(&[1.0e308, 1.7e308], 95).unwrap().is_finite());
    }

    #[test]
    fn test_deserialize_validates_margin() {
        let estimator: PercentileEstimator = serde_json::from_str(r#"{"margin":0.5}"#).unwrap();
        assert_eq!(estimator.margin(), 0.5);
        let estimator: PercentileEstimator = serde_json::from_str("{}").unwrap();
        assert_eq!(estimator, PercentileEstimator::default());
        assert!(serde_json::from_str::<PercentileEstimator>(r#"{"margin":-5}"#).is_err());
    }

    #[test]
    fn test_recommend_uses_default_quantile() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let estimator = PercentileEstimator::default();
        assert_eq!(
            estimator.recommend(&values).unwrap(),
            estimator.estimate(&values, DEFAULT_QUANTILE).unwrap()
        );
    }
}
