//! # rightsizing-server
//!
//! HTTP/JSON RPC server exposing the forecast engine and the rightsizing
//! estimator.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/v1/forecast` | Forecast a series over the next hours |
//! | POST | `/api/v1/rightsizing` | Percentile-plus-margin recommendation |
//! | GET | `/health/live` | Liveness probe |
//! | GET | `/health/ready` | Readiness probe |
//! | GET | `/health` | Legacy health endpoint |

pub mod config;
pub mod error;
pub mod routes;
pub mod wire;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use forecast_facade::{Clock, DefaultEngine, Zone};
use rightsizing::PercentileEstimator;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DefaultEngine>,
    pub estimator: Arc<PercentileEstimator>,
    /// Zone for converting wire timestamps
    pub zone: Zone,
    pub default_quantile: u32,
}

impl AppState {
    /// State reading the system clock in the configured zone
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let engine = config.forecast.build()?;
        Self::assemble(config, engine)
    }

    /// State reading an explicit clock
    pub fn with_clock(config: &ServerConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let engine = config.forecast.build_with_clock(clock)?;
        Self::assemble(config, engine)
    }

    fn assemble(config: &ServerConfig, engine: DefaultEngine) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: Arc::new(engine),
            estimator: Arc::new(PercentileEstimator::with_margin(config.margin)?),
            zone: config.forecast.zone,
            default_quantile: config.quantile,
        })
    }
}

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - ready once serving; reports the wire timestamp zone
async fn readiness(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
        "zone": state.zone.to_string(),
    }))
}

/// Build the complete router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        // Legacy health endpoint
        .route("/health", get(liveness))
        .route("/api/v1/forecast", post(routes::forecast))
        .route("/api/v1/rightsizing", post(routes::rightsizing))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
