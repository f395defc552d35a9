//! Error responses for the REST API.
//!
//! Every failure is rendered as the same JSON envelope:
//!
//! ```json
//! {"status": "Not Found", "message": "Appointment not found", "error": "document not found"}
//! ```
//!
//! `status` is the HTTP reason phrase, `message` is written for humans, and `error` carries the
//! underlying error text for diagnostics.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use utoipa::ToSchema;

/// JSON body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Display) -> Self {
        Self {
            status,
            message: message.into(),
            error: error.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, error)
    }

    pub fn not_found(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, error)
    }

    pub fn conflict(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::CONFLICT, message, error)
    }

    /// The store answered with an unexpected failure while serving a single record.
    pub fn bad_gateway(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message, error)
    }

    pub fn internal(message: impl Into<String>, error: impl Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, error)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message.clone(),
            error: self.error.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

/// Map a body that failed to parse into a 400 response.
pub fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request("Invalid request body", rejection.body_text())
}

/// Reject empty path identifiers before any store call.
pub fn require_id(id: &str, message: &str) -> Result<(), ApiError> {
    if id.is_empty() {
        return Err(ApiError::bad_request(message, "missing id"));
    }
    Ok(())
}
