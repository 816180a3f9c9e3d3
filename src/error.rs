use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cel_shade::CartoonError;
use serde_json::json;
use thiserror::Error;

/// Message returned to clients for every server-side failure.
pub const GENERIC_FAILURE: &str = "Failed to process the image.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid file type: {0}")]
    UnsupportedType(String),

    #[error("Invalid image: {0}")]
    Input(String),

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Not found")]
    NotFound,

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CartoonError> for ApiError {
    fn from(e: CartoonError) -> Self {
        if e.is_input() {
            ApiError::Input(e.to_string())
        } else {
            ApiError::Processing(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) | ApiError::UnsupportedType(_) | ApiError::Input(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Processing(_) | ApiError::Internal(_) => {
                // Details stay in the log.
                tracing::error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
