//! HTTP error handling.
//!
//! Service errors are mapped here to status codes and a uniform
//! `{"message": ...}` JSON body. Domain failures carry their caller-safe
//! message; infrastructure failures are logged and collapsed to a generic
//! message so internals never leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::services::{AuthError, InventoryError};

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed a domain rule.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid, or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected internal failure. The source is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_owned(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmptyName
            | AuthError::InvalidEmail(_)
            | AuthError::WeakPassword
            | AuthError::EmailExists => Self::BadRequest(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::DuplicateCar
            | InventoryError::RemoveDenied
            | InventoryError::UpdateDenied => Self::BadRequest(err.to_string()),
            InventoryError::Repository(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_auth_errors_map_to_bad_request() {
        assert!(matches!(
            ApiError::from(AuthError::EmailExists),
            ApiError::BadRequest(msg) if msg == "Email already exists"
        ));
    }

    #[test]
    fn invalid_credentials_map_to_unauthorized() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(msg) if msg == "Invalid email or password"
        ));
    }

    #[test]
    fn denial_messages_pass_through_verbatim() {
        assert!(matches!(
            ApiError::from(InventoryError::RemoveDenied),
            ApiError::BadRequest(msg)
                if msg == "Car not found or you do not have permission to delete this car"
        ));
        assert!(matches!(
            ApiError::from(InventoryError::UpdateDenied),
            ApiError::BadRequest(msg)
                if msg == "Car not found or you do not have permission to update this car"
        ));
    }
}
