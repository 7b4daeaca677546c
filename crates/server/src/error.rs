//! Request errors and their HTTP mapping

use crate::wire::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forecast_facade::ForecastError;
use rightsizing::RightsizingError;
use thiserror::Error;

/// Failure of one RPC call, tagged with the request id
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    InvalidInput { id: String, message: String },

    #[error("{message}")]
    ModelFit { id: String, message: String },

    #[error("{message}")]
    Internal { id: String, message: String },
}

impl ApiError {
    pub fn forecast(id: impl Into<String>, err: ForecastError) -> Self {
        let id = id.into();
        let message = err.to_string();
        if err.is_invalid_input() {
            ApiError::InvalidInput { id, message }
        } else {
            ApiError::ModelFit { id, message }
        }
    }

    pub fn rightsizing(id: impl Into<String>, err: RightsizingError) -> Self {
        ApiError::InvalidInput {
            id: id.into(),
            message: err.to_string(),
        }
    }

    pub fn internal(id: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            id: id.into(),
            message: format!("Internal error: {}", err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ModelFit { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput { .. } => "invalid_input",
            ApiError::ModelFit { .. } => "model_fit",
            ApiError::Internal { .. } => "internal",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ApiError::InvalidInput { id, .. }
            | ApiError::ModelFit { id, .. }
            | ApiError::Internal { id, .. } => id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            id: self.id().to_string(),
            code: self.code().to_string(),
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
