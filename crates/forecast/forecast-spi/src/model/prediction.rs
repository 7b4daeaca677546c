//! Model output for one timestamp

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Point estimate and uncertainty bounds at one timestamp.
///
/// Backends must keep `yhat_lower <= yhat <= yhat_upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub timestamp: NaiveDateTime,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl Prediction {
    /// Width of the uncertainty interval
    pub fn width(&self) -> f64 {
        self.yhat_upper - self.yhat_lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prediction_width() {
        let prediction = Prediction {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            yhat: 10.0,
            yhat_lower: 9.0,
            yhat_upper: 12.5,
        };
        assert_eq!(prediction.width(), 3.5);
    }
}
