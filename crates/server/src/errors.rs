use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use service::auth::errors::AuthError;
use service::blob::BlobError;
use service::errors::{FieldIssue, ServiceError};

/// JSON error envelope: `{message}` or `{message, errors}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<FieldIssue>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldIssue]>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: None }
    }

    pub fn validation(issues: Vec<FieldIssue>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: "Validation failed".into(), errors: Some(issues) }
    }

    /// Map a product-service failure; anything unexpected becomes a 500 with
    /// `context` as the message and the detail only in the log.
    pub fn from_service(err: ServiceError, context: &str) -> Self {
        match err {
            ServiceError::Validation(issues) => Self::validation(issues),
            ServiceError::InvalidId(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid product ID"),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Product not found"),
            ServiceError::Blob(BlobError::NotFound(_)) => Self::new(StatusCode::NOT_FOUND, "Image not found"),
            other => {
                error!(error = %other, "{}", context);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::InvalidToken => Self::new(StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::Forbidden => Self::new(StatusCode::FORBIDDEN, "Admin access only"),
            AuthError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            other => {
                error!(error = %other, code = other.code(), "auth failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { message: &self.message, errors: self.errors.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
