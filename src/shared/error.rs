//! Application Error Types
//!
//! Two layers of errors live here:
//!
//! - [`ContentError`] is the failure taxonomy of the content write engine.
//!   Every storage error is classified into one of its kinds before it leaves
//!   a unit of work.
//! - [`AppError`] is the HTTP boundary error with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Which kind of store constraint rejected a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Failure taxonomy of the content write engine.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("source entity not found")]
    SourceNotFound,

    #[error("target locale equals the source locale")]
    SameLocale,

    #[error("constraint violation on {constraint}")]
    ConstraintViolation {
        kind: ConstraintKind,
        constraint: String,
    },

    #[error("translation failed: {0}")]
    TranslationFailed(String),

    /// Connection or transaction failure. The detail is kept for logs only
    /// and never rendered by `Display`.
    #[error("infrastructure failure")]
    Infrastructure(String),
}

impl ContentError {
    pub fn unique(constraint: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            kind: ConstraintKind::Unique,
            constraint: constraint.into(),
        }
    }

    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            constraint: constraint.into(),
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            ContentError::NotFound(_) => "not_found",
            ContentError::SourceNotFound => "source_not_found",
            ContentError::SameLocale => "same_locale",
            ContentError::ConstraintViolation { .. } => "constraint_violation",
            ContentError::TranslationFailed(_) => "translation_failed",
            ContentError::Infrastructure(_) => "infrastructure",
        }
    }
}

impl From<sqlx::Error> for ContentError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return ContentError::unique(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return ContentError::foreign_key(constraint);
            }
        }
        tracing::error!(error = %e, "Storage statement failed");
        ContentError::Infrastructure(e.to_string())
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ContentError> for AppError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            ContentError::SourceNotFound => AppError::NotFound("Source entity not found".into()),
            ContentError::SameLocale => {
                AppError::BadRequest("Target locale must differ from the source locale".into())
            }
            ContentError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                constraint,
            } => AppError::Conflict(constraint),
            ContentError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                constraint,
            } => AppError::Validation(format!("Referenced row does not exist ({})", constraint)),
            ContentError::TranslationFailed(msg) => AppError::BadGateway(msg),
            ContentError::Infrastructure(detail) => AppError::Internal(detail),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, 10001, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 10002, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, 10003, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, 10005, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, 10007, msg.clone()),
            AppError::BadGateway(msg) => {
                tracing::warn!("Upstream collaborator failed: {}", msg);
                (StatusCode::BAD_GATEWAY, 10008, "Translation service failed".into())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, 10000, "Internal server error".into())
            }
        };

        let body = ErrorResponse {
            code,
            message,
            errors: None,
        };

        (status, Json(body)).into_response()
    }
}
