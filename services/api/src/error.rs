//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::FieldError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or expired bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Login with an unknown email or a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authenticated, but not allowed to touch this resource
    #[error("Forbidden")]
    Forbidden,

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failures
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Request body over the configured limit
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// Map an extractor rejection: 413 for bodies over the limit, 400 otherwise
    pub fn rejected(status: StatusCode, text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(text)
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "message": "Unauthorized" })),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid email or password" }),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "message": "Forbidden" })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation failed", "details": details }),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "message": "Payload too large" }),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Internal server error" }),
            ),
            ApiError::Database(DatabaseError::UniqueViolation(constraint)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": "Duplicate value",
                    "details": [{ "field": constraint_field(&constraint), "message": "already exists" }]
                }),
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Request field behind a unique constraint
fn constraint_field(constraint: &str) -> &str {
    match constraint {
        "users_email_key" => "email",
        other => other,
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
