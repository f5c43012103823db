//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use firerisk_core::ServiceError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or out-of-domain request body
    #[error("{0}")]
    Validation(String),

    /// Predict called while no model is loaded
    #[error("model service is not ready")]
    ServiceNotReady,

    /// Anything that should never surface to a well-behaved client
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ServiceNotReady => {
                (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotReady => AppError::ServiceNotReady,
            other => AppError::Internal(other.to_string()),
        }
    }
}
