//! Rightsizing
//!
//! Recommends a resource allocation from observed utilisation samples: the
//! interpolated percentile of the samples plus a safety margin.
//!
//! ## Example
//!
//! ```rust
//! use rightsizing::PercentileEstimator;
//!
//! let estimator = PercentileEstimator::default();
//! let recommended = estimator.estimate(&[1.0, 2.0, 3.0, 4.0, 5.0], 95).unwrap();
//! assert!((recommended - 5.76).abs() < 1e-9);
//! ```

pub mod error;
pub mod percentile;

pub use error::{Result, RightsizingError};
pub use percentile::{percentile, PercentileEstimator, DEFAULT_MARGIN, DEFAULT_QUANTILE};
