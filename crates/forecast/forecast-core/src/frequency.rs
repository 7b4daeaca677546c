//! Frequency strings such as `5min`, `30s` or `1H`
//!
//! A frequency is an optional positive count followed by a unit:
//! `s`/`S`/`sec`, `min`/`T`/`m`, `h`/`H`, `D`/`d`, `W`/`w`.

use chrono::{NaiveDateTime, TimeDelta};
use forecast_spi::{ForecastError, Result};

/// Parse a frequency string into a positive step.
pub fn parse_frequency(s: &str) -> Result<TimeDelta> {
    let invalid = || ForecastError::InvalidFrequency(s.to_string());

    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let count: i64 = if digits.is_empty() {
        1
    } else {
        digits.parse().map_err(|_| invalid())?
    };
    if count <= 0 {
        return Err(invalid());
    }

    let unit_secs: i64 = match unit.trim() {
        "s" | "S" | "sec" => 1,
        "min" | "T" | "m" => 60,
        "h" | "H" => 3_600,
        "D" | "d" => 86_400,
        "W" | "w" => 604_800,
        _ => return Err(invalid()),
    };

    count
        .checked_mul(unit_secs)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(invalid)
}

/// Median gap between consecutive timestamps, if there are at least two.
pub fn median_spacing(sorted: &[NaiveDateTime]) -> Option<TimeDelta> {
    let mut gaps: Vec<TimeDelta> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.is_empty() {
        return None;
    }
    gaps.sort();
    Some(gaps[gaps.len() / 2])
}
