use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::engine::EngineError;

#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    BadRequest(String),
    NotFound(String),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Engine(e) => match e {
                EngineError::VehicleNotFound(_) | EngineError::BookingNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                EngineError::VehicleNotAvailableOnDate { .. }
                | EngineError::VehicleAlreadyBooked { .. }
                | EngineError::BookingAlreadyCancelled(_)
                | EngineError::NotAPolygon(_)
                | EngineError::LimitExceeded(_) => StatusCode::BAD_REQUEST,
                EngineError::BookingError(_)
                | EngineError::DatasetInvalid(_)
                | EngineError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Engine(e) if status.is_server_error() => {
                tracing::error!("request failed: {e}");
                "internal server error".to_string()
            }
            ApiError::Engine(e) => e.to_string(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
