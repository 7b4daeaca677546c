//! Forecast Facade
//!
//! High-level API for forecasting. Re-exports all public types from the
//! forecast stack for convenient usage.

// Re-export everything from API (which includes SPI and core)
pub use forecast_api::*;

// Explicit re-exports for documentation
pub use forecast_api::prelude;

// Re-export core helpers at root
pub use forecast_core::frequency::parse_frequency;
pub use forecast_core::time::{format_datetime, parse_datetime, resolve_with};
