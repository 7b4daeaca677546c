//! Error types for rightsizing

use thiserror::Error;

/// Rightsizing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RightsizingError {
    #[error("Invalid input: empty sample set")]
    EmptySampleSet,

    #[error("Invalid input: quantile {quantile} is outside 0..=100")]
    QuantileOutOfRange { quantile: f64 },

    #[error("Invalid input: sample {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("Invalid input: result is not a finite number")]
    NonFiniteResult,

    #[error("Invalid margin {margin}: must be finite and non-negative")]
    InvalidMargin { margin: f64 },
}

impl RightsizingError {
    /// Every rightsizing failure is caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        true
    }
}

/// Result type for rightsizing
pub type Result<T> = std::result::Result<T, RightsizingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message() {
        assert_eq!(
            RightsizingError::EmptySampleSet.to_string(),
            "Invalid input: empty sample set"
        );
    }

    #[test]
    fn test_all_invalid_input() {
        let errors = [
            RightsizingError::EmptySampleSet,
            RightsizingError::QuantileOutOfRange { quantile: 101.0 },
            RightsizingError::NonFiniteSample { index: 3 },
            RightsizingError::NonFiniteResult,
            RightsizingError::InvalidMargin { margin: -1.0 },
        ];
        assert!(errors.iter().all(RightsizingError::is_invalid_input));
    }
}
