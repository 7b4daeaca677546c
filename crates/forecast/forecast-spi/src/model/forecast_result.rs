//! Forecast result model

use crate::model::{Prediction, TimeSeriesPoint};
use serde::{Deserialize, Serialize};

/// The statistic a series carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Point estimate
    Yhat,
    /// Upper uncertainty bound
    YhatUpper,
    /// Lower uncertainty bound
    YhatLower,
}

impl SeriesKind {
    /// Response order of the three series
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Yhat, SeriesKind::YhatUpper, SeriesKind::YhatLower];

    /// Wire name of the series
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Yhat => "yhat",
            SeriesKind::YhatUpper => "yhat_upper",
            SeriesKind::YhatLower => "yhat_lower",
        }
    }

    fn pick(&self, prediction: &Prediction) -> f64 {
        match self {
            SeriesKind::Yhat => prediction.yhat,
            SeriesKind::YhatUpper => prediction.yhat_upper,
            SeriesKind::YhatLower => prediction.yhat_lower,
        }
    }
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named statistic over the forecast window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub kind: SeriesKind,
    pub data: Vec<TimeSeriesPoint>,
}

impl NamedSeries {
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Forecast over the output window: `yhat`, `yhat_upper`, `yhat_lower`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub series: Vec<NamedSeries>,
}

impl ForecastResult {
    /// Split chronological predictions into the three named series.
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let series = SeriesKind::ALL
            .iter()
            .map(|kind| NamedSeries {
                kind: *kind,
                data: predictions
                    .iter()
                    .map(|p| TimeSeriesPoint::new(p.timestamp, kind.pick(p)))
                    .collect(),
            })
            .collect();
        Self { series }
    }

    /// Look up a series by kind
    pub fn get(&self, kind: SeriesKind) -> Option<&NamedSeries> {
        self.series.iter().find(|s| s.kind == kind)
    }

    /// Number of timestamps in the window
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, |s| s.data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn predictions() -> Vec<Prediction> {
        (0..3)
            .map(|i| Prediction {
                timestamp: start() + TimeDelta::minutes(5 * i),
                yhat: 10.0 + i as f64,
                yhat_lower: 9.0 + i as f64,
                yhat_upper: 11.0 + i as f64,
            })
            .collect()
    }

    #[test]
    fn test_series_names_and_order() {
        let result = ForecastResult::from_predictions(&predictions());
        let names: Vec<&str> = result.series.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["yhat", "yhat_upper", "yhat_lower"]);
    }

    #[test]
    fn test_series_values() {
        let result = ForecastResult::from_predictions(&predictions());

        let upper = result.get(SeriesKind::YhatUpper).unwrap();
        assert_eq!(upper.data[2].value, 13.0);

        let lower = result.get(SeriesKind::YhatLower).unwrap();
        assert_eq!(lower.data[0].value, 9.0);
        assert_eq!(lower.data[0].timestamp, start());
    }

    #[test]
    fn test_series_share_timestamps() {
        let result = ForecastResult::from_predictions(&predictions());
        let yhat = result.get(SeriesKind::Yhat).unwrap();
        for series in &result.series {
            let a: Vec<_> = series.data.iter().map(|p| p.timestamp).collect();
            let b: Vec<_> = yhat.data.iter().map(|p| p.timestamp).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_empty_result() {
        let result = ForecastResult::from_predictions(&[]);
        assert_eq!(result.series.len(), 3);
        assert!(result.is_empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SeriesKind::YhatLower.to_string(), "yhat_lower");
    }
}
