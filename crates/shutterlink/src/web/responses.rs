//! HTTP response types and error mapping
//!
//! Every API failure is reported as `{ "success": false, "error": "…" }`
//! with a status code derived from the error category. Server faults are
//! logged in full here and reported to the client with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;

/// JSON body of a failed API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Build a JSON error response with an explicit status.
pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

/// Convert an [`AppError`] into the matching HTTP response.
///
/// Validation failures carry their user-facing description; storage,
/// encoding, and configuration failures are collapsed into a generic
/// server error after logging the detail.
pub fn handle_error(error: AppError) -> Response {
    match &error {
        AppError::Validation(validation) => {
            error_response(StatusCode::BAD_REQUEST, validation.to_string())
        }
        AppError::NotFound { id } => {
            error_response(StatusCode::NOT_FOUND, format!("Image {id} not found."))
        }
        AppError::Expired { id } => {
            error_response(StatusCode::GONE, format!("Image {id} has expired."))
        }
        AppError::Storage(_) | AppError::Encoding(_) | AppError::Configuration { .. } => {
            error!("Internal error while handling request: {}", error);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error.")
        }
    }
}
