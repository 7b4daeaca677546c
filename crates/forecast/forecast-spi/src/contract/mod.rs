//! Contract module containing trait definitions for forecast operations

mod clock;
mod forecast_backend;

pub use clock::Clock;
pub use forecast_backend::ForecastBackend;
