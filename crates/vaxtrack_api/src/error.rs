//! HTTP error mapping.
//!
//! # Responsibility
//! - Convert core repository errors into status codes and a stable JSON body.
//! - Hide storage details from clients while logging them server-side.
//!
//! # Invariants
//! - Every error class maps to a distinct `code`.
//! - Response body shape is always `{ "error": { "code", "message" } }`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use vaxtrack_core::{error_code, RepoError};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    /// Malformed body, query string or payload field.
    #[error("invalid request: {0}")]
    BadRequest(String),
    /// Path id that cannot name any stored entity.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("connection lock poisoned")]
    LockPoisoned,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Repo(err) => {
                let status = match err {
                    RepoError::Validation(_) => StatusCode::BAD_REQUEST,
                    RepoError::NotFound { .. } => StatusCode::NOT_FOUND,
                    RepoError::DanglingReference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    RepoError::DuplicateName(_) | RepoError::ReferentialConflict { .. } => {
                        StatusCode::CONFLICT
                    }
                    RepoError::UninitializedConnection { .. }
                    | RepoError::Db(_)
                    | RepoError::InvalidData(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!(
                        "event=http_error module=api status=error error_code={} error={}",
                        error_code(err),
                        err
                    );
                    "an internal error occurred".to_string()
                } else {
                    err.to_string()
                };
                (status, error_code(err), message)
            }
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, "bad_request", detail.clone()),
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, "not_found", detail.clone()),
            Self::LockPoisoned => {
                error!("event=http_error module=api status=error error_code=lock_poisoned");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "an internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
