use serde::Serialize;
use thiserror::Error;

use crate::blob::BlobError;

/// One field-level validation problem, addressed by its path in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub code: &'static str,
    pub path: Vec<String>,
    pub message: String,
}

impl FieldIssue {
    pub fn new(code: &'static str, field: &str, message: impl Into<String>) -> Self {
        Self { code, path: vec![field.to_string()], message: message.into() }
    }

    pub fn field(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}
