//! HTTP error mapping
//!
//! Every failed operation answers with `{"success": false, "error": ...}`
//! and a status from the fixed taxonomy: 400 validation, 401 auth,
//! 404 not found, 409 conflict, 500 internal. Storage and I/O error text
//! is logged and never forwarded to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use attendify_common::Error;

/// Wrapper turning the common error taxonomy into HTTP responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required fields: {}", fields.join(", ")),
            ),
            Error::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::Database(err) => {
                error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Error::Io(err) => {
                error!("I/O error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Error::Config(msg) | Error::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
