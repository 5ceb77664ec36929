//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Storage-side failures. Never shown to clients.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("commit rejected: {0}")]
    Commit(String),
    #[error("invalid database url: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    /// Message is fixed per operation; the cause is logged, not returned.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Converts any storage failure into a 500 carrying only the operation's message.
pub trait OrInternal<T> {
    fn or_internal(self, message: impl Into<String>) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> OrInternal<T> for Result<T, E> {
    fn or_internal(self, message: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| {
            let message = message.into();
            tracing::error!(error = %e, "{}", message);
            AppError::Internal(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_hides_cause() {
        let r: Result<(), RepositoryError> = Err(RepositoryError::Commit("disk on fire".into()));
        let err = r.or_internal("Database failure").unwrap_err();
        assert_eq!(err.to_string(), "Database failure");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_is_client_error() {
        let resp = AppError::Validation("title is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::NotFound("Talk not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
