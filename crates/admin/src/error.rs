//! Unified error handling for the admin console.
//!
//! Mirrors the storefront's `AppError`: capture server-side failures to
//! Sentry, respond with a JSON envelope, never leak internals.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;
use crate::services::images::ImageError;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Commerce backend operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Image host operation failed.
    #[error("Image host error: {0}")]
    Image(#[from] ImageError),

    /// Client-side schema check failed.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in but not an admin.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error envelope returned to the client.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Backend(_) | Self::Image(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Backend(err) => match err {
                BackendError::NotFound(_) => StatusCode::NOT_FOUND,
                BackendError::InvalidToken => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Image(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Self::Backend(BackendError::InvalidToken) => "Invalid token".to_string(),
            Self::Backend(_) | Self::Image(_) => "External service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Validation(_) => "Validation failed".to_string(),
            _ => self.to_string(),
        };

        let fields = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        (status, Json(ErrorBody { error: message, fields })).into_response()
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AdminError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AdminError::Unauthorized("no token".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AdminError::Forbidden("not an admin".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AdminError::Validation(vec![FieldError::new(
                "price",
                "must be positive"
            )])),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AdminError::Backend(BackendError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
    }
}
