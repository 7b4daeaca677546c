//! Wire messages
//!
//! Timestamps travel as epoch seconds and are converted to local calendar
//! time in the server's zone on the way in, and back on the way out.

use chrono::NaiveDateTime;
use forecast_facade::{ForecastError, ForecastResult, TimeSeriesPoint, Zone};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One observation on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireDatapoint {
    pub timestamp: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub id: String,
    pub data: Vec<WireDatapoint>,
    /// Step between future timestamps, e.g. `5min`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

/// A named forecast series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSeries {
    pub name: String,
    pub data: Vec<WireDatapoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub id: String,
    pub result: Vec<WireSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightsizingRequest {
    pub id: String,
    pub data: Vec<f64>,
    /// Percentile to recommend at, 0..=100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantile: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightsizingResponse {
    pub id: String,
    pub result: f64,
}

/// Error body shared by both methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub id: String,
    pub code: String,
    pub error: String,
}

/// Wire observations to local calendar time
pub fn to_points(zone: Zone, data: &[WireDatapoint]) -> Result<Vec<TimeSeriesPoint>, ForecastError> {
    data.iter()
        .map(|d| Ok(TimeSeriesPoint::new(zone.from_epoch(d.timestamp)?, d.value)))
        .collect()
}

/// Forecast series back to epoch seconds, keeping their order.
///
/// Local times skipped by a DST transition have no instant and are left
/// out of every series.
pub fn to_wire(zone: Zone, result: &ForecastResult) -> Vec<WireSeries> {
    series_to_wire(result, |local| zone.resolve(local))
}

/// [`to_wire`] with an explicit local-time resolver
pub fn series_to_wire<F>(result: &ForecastResult, resolve: F) -> Vec<WireSeries>
where
    F: Fn(&NaiveDateTime) -> Option<i64>,
{
    let series: Vec<WireSeries> = result
        .series
        .iter()
        .map(|series| WireSeries {
            name: series.name().to_string(),
            data: series
                .data
                .iter()
                .filter_map(|p| {
                    resolve(&p.timestamp).map(|timestamp| WireDatapoint {
                        timestamp,
                        value: p.value,
                    })
                })
                .collect(),
        })
        .collect();

    let skipped = result.len() - series.first().map_or(0, |s| s.data.len());
    if skipped > 0 {
        debug!(skipped, "dropped forecast rows inside a DST gap");
    }
    series
}
