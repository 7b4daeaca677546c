//! Wall-clock source for the forecast window

use chrono::NaiveDateTime;

/// Source of "now" in local calendar time.
pub trait Clock: Send + Sync {
    /// Current local time, truncated to whole seconds
    fn now(&self) -> NaiveDateTime;
}
