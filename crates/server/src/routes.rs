//! API route handlers
//!
//! Computation runs on the blocking pool; the async workers only decode,
//! dispatch and encode.

use crate::error::ApiError;
use crate::wire::{
    to_points, to_wire, ForecastRequest, ForecastResponse, RightsizingRequest, RightsizingResponse,
};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use tokio::task;
use tracing::{info, warn};

/// POST /api/v1/forecast
pub async fn forecast(
    State(state): State<AppState>,
    Json(req): Json<ForecastRequest>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let id = req.id.clone();
    info!(id = %id, points = req.data.len(), frequency = ?req.frequency, "forecast request");

    let outcome = task::spawn_blocking(move || run_forecast(&state, req))
        .await
        .map_err(|e| ApiError::internal(id.as_str(), e))
        .and_then(|result| result);

    respond(outcome)
}

fn run_forecast(state: &AppState, req: ForecastRequest) -> Result<ForecastResponse, ApiError> {
    let points = to_points(state.zone, &req.data).map_err(|e| ApiError::forecast(req.id.as_str(), e))?;
    let result = state
        .engine
        .forecast(&points, req.frequency.as_deref())
        .map_err(|e| ApiError::forecast(req.id.as_str(), e))?;
    Ok(ForecastResponse {
        result: to_wire(state.zone, &result),
        id: req.id,
    })
}

/// POST /api/v1/rightsizing
pub async fn rightsizing(
    State(state): State<AppState>,
    Json(req): Json<RightsizingRequest>,
) -> Result<Json<RightsizingResponse>, ApiError> {
    let id = req.id.clone();
    info!(id = %id, samples = req.data.len(), quantile = ?req.quantile, "rightsizing request");

    let outcome = task::spawn_blocking(move || run_rightsizing(&state, req))
        .await
        .map_err(|e| ApiError::internal(id.as_str(), e))
        .and_then(|result| result);

    respond(outcome)
}

fn run_rightsizing(
    state: &AppState,
    req: RightsizingRequest,
) -> Result<RightsizingResponse, ApiError> {
    let quantile = req.quantile.unwrap_or(state.default_quantile);
    let result = state
        .estimator
        .estimate(&req.data, quantile)
        .map_err(|e| ApiError::rightsizing(req.id.as_str(), e))?;
    Ok(RightsizingResponse { id: req.id, result })
}

fn respond<T>(outcome: Result<T, ApiError>) -> Result<Json<T>, ApiError> {
    match outcome {
        Ok(body) => Ok(Json(body)),
        Err(err) => {
            warn!(id = %err.id(), code = err.code(), error = %err, "request failed");
            Err(err)
        }
    }
}
