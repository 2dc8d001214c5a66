//! Web error types and response formatting.
//!
//! Every component propagates failures to its caller; this type is the
//! terminal point that converts them into responses. Client-side problems
//! become 4xx with a plain status-text body and are never logged as faults.
//! Server-side problems are logged with their cause and become a generic 500
//! — the cause never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snipbin_core::StoreError;

/// Application error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed client input (unparseable form, CSRF mismatch, ...).
    #[error("client error: {0}")]
    Client(StatusCode),

    /// The requested resource is absent or expired.
    #[error("not found")]
    NotFound,

    /// Snippet store failure.
    #[error("store error: {0}")]
    Store(StoreError),

    /// Template rendering failure.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Session load/store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Broken internal invariant (e.g., a handler referenced a page the
    /// template cache never produced).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

/// Plain status-text body for a status code.
fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Internal Server Error")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Client(status) => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(err) => {
                tracing::error!(error = %err, "store error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Template(err) => {
                tracing::error!(error = %err, "template error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Session(err) => {
                tracing::error!(error = %err, "session error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, status_text(status)).into_response()
    }
}
