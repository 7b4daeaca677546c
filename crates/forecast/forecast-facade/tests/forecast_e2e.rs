//! End-to-end tests for the forecast stack
//!
//! Drives complete forecasts through the facade with a frozen clock.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use forecast_facade::{FixedClock, ForecastConfig, SeriesKind, TimeSeriesPoint};
use std::sync::Arc;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn series(n: i64, f: impl Fn(i64) -> f64) -> Vec<TimeSeriesPoint> {
    (0..n)
        .map(|i| TimeSeriesPoint::new(start() + TimeDelta::minutes(5 * i), f(i)))
        .collect()
}

#[test]
fn e2e_linear_series_is_extrapolated() {
    let data = series(100, |i| 10.0 + 0.5 * i as f64);
    let now = data[99].timestamp;
    let engine = ForecastConfig::default()
        .build_with_clock(Arc::new(FixedClock(now)))
        .unwrap();

    let result = engine.forecast(&data, None).unwrap();
    assert_eq!(result.len(), 73);

    let yhat = result.get(SeriesKind::Yhat).unwrap();
    for point in &yhat.data {
        let steps = (point.timestamp - start()).num_minutes() / 5;
        let expected = 10.0 + 0.5 * steps as f64;
        assert!(
            (point.value - expected).abs() < 1e-3,
            "at {}: {} vs {}",
            point.timestamp,
            point.value,
            expected
        );
    }
}

#[test]
fn e2e_bounds_surround_estimate() {
    let data = series(300, |i| {
        40.0 + 15.0 * ((i as f64) * 0.2).sin() + ((i * 37) % 11) as f64
    });
    let now = data[299].timestamp;
    let engine = ForecastConfig::default()
        .build_with_clock(Arc::new(FixedClock(now)))
        .unwrap();

    let result = engine.forecast(&data, None).unwrap();
    assert!(!result.is_empty());

    let yhat = &result.get(SeriesKind::Yhat).unwrap().data;
    let upper = &result.get(SeriesKind::YhatUpper).unwrap().data;
    let lower = &result.get(SeriesKind::YhatLower).unwrap().data;
    assert_eq!(yhat.len(), upper.len());
    assert_eq!(yhat.len(), lower.len());

    for ((y, u), l) in yhat.iter().zip(upper).zip(lower) {
        assert_eq!(y.timestamp, u.timestamp);
        assert_eq!(y.timestamp, l.timestamp);
        assert!(l.value <= y.value && y.value <= u.value);
    }
    assert!(yhat.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn e2e_window_follows_clock() {
    let data = series(50, |i| (i % 10) as f64);
    let last = data[49].timestamp;

    let later = ForecastConfig::default()
        .build_with_clock(Arc::new(FixedClock(last + TimeDelta::hours(2))))
        .unwrap()
        .forecast(&data, None)
        .unwrap();
    let first = later.get(SeriesKind::Yhat).unwrap().data[0].timestamp;
    assert_eq!(first, last + TimeDelta::hours(2));
    assert_eq!(later.len(), 73);

    let past_horizon = ForecastConfig::default()
        .build_with_clock(Arc::new(FixedClock(last + TimeDelta::days(30))))
        .unwrap()
        .forecast(&data, None)
        .unwrap();
    assert!(past_horizon.is_empty());
}

#[test]
fn e2e_hourly_history_with_minute_output() {
    // Three days of hourly samples forecast on a 5 minute grid
    let data: Vec<TimeSeriesPoint> = (0..72)
        .map(|i| {
            let hour = (i % 24) as f64;
            TimeSeriesPoint::new(start() + TimeDelta::hours(i), 50.0 + hour)
        })
        .collect();
    let now = data[71].timestamp;
    let engine = ForecastConfig::default()
        .build_with_clock(Arc::new(FixedClock(now)))
        .unwrap();

    let result = engine.forecast(&data, Some("5min")).unwrap();
    assert_eq!(result.len(), 73);
}
