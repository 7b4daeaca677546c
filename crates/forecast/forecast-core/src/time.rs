//! Calendar time handling
//!
//! Observations travel as epoch seconds on the wire but are modelled in local
//! calendar time (`YYYY-MM-DD HH:MM:SS`, whole seconds). Sub-second precision
//! is dropped on the way in.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, Timelike, Utc};
use forecast_spi::{Clock, ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Textual form of the internal representation
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone used to turn instants into local calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Zone {
    /// The process-local zone
    #[default]
    Local,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// Parse `local` or an offset such as `+09:00`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Zone::utc());
        }
        s.parse::<FixedOffset>()
            .map(Zone::Fixed)
            .map_err(|e| ForecastError::InvalidParameter {
                name: "zone".to_string(),
                reason: format!("'{}' is not 'local' or a UTC offset: {}", s, e),
            })
    }

    /// Epoch seconds to local calendar time.
    pub fn from_epoch(&self, secs: i64) -> Result<NaiveDateTime> {
        let instant = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            ForecastError::InvalidTimestamp(format!("epoch second {} is out of range", secs))
        })?;
        Ok(self.localize(instant))
    }

    /// Local calendar time back to epoch seconds.
    ///
    /// Ambiguous local times resolve to the earliest instant; times skipped
    /// by a DST transition are rejected.
    pub fn to_epoch(&self, local: &NaiveDateTime) -> Result<i64> {
        self.resolve(local).ok_or_else(|| {
            ForecastError::InvalidTimestamp(format!(
                "{} does not exist in zone {}",
                format_datetime(local),
                self
            ))
        })
    }

    /// Epoch seconds of a local time, `None` inside a DST gap.
    pub fn resolve(&self, local: &NaiveDateTime) -> Option<i64> {
        match self {
            Zone::Local => resolve_with(local, |secs| {
                DateTime::from_timestamp(secs, 0)
                    .map(|dt| dt.with_timezone(&Local).offset().local_minus_utc())
            }),
            Zone::Fixed(offset) => {
                let offset = offset.local_minus_utc();
                resolve_with(local, |_| Some(offset))
            }
        }
    }

    /// Current local time, whole seconds
    pub fn now(&self) -> NaiveDateTime {
        let now = self.localize(Utc::now());
        now.with_nanosecond(0).unwrap_or(now)
    }

    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => instant.with_timezone(&Local).naive_local(),
            Zone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl TryFrom<String> for Zone {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        Zone::parse(&value)
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.to_string()
    }
}

/// Resolve a local time under a zone rule.
///
/// `offset_at` gives the UTC offset in seconds east in force at an epoch
/// second. Transitions are assumed to be at least a day apart. Of the
/// instants that display as `local`, the earliest is returned; `None` means
/// the local time was skipped by a forward transition.
pub fn resolve_with<F>(local: &NaiveDateTime, offset_at: F) -> Option<i64>
where
    F: Fn(i64) -> Option<i32>,
{
    let wall = local.and_utc().timestamp();
    let before = i64::from(offset_at(wall - SECONDS_PER_DAY)?);
    let after = i64::from(offset_at(wall + SECONDS_PER_DAY)?);

    let mut candidates = [wall - before, wall - after];
    candidates.sort_unstable();
    candidates
        .into_iter()
        .find(|&instant| offset_at(instant).map(i64::from) == Some(wall - instant))
}

/// Format as `YYYY-MM-DD HH:MM:SS`
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse `YYYY-MM-DD HH:MM:SS`
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)
        .map_err(|e| ForecastError::InvalidTimestamp(format!("'{}': {}", s, e)))
}

/// Wall clock reading the system time in a [`Zone`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: Zone,
}

impl SystemClock {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.zone.now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
