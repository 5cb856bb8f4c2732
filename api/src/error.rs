//! Unified error types for the birdfeed API
//!
//! This module defines error types for each layer:
//! - `PlatformError`: social platform client errors
//! - `StoreError`: cookie store errors
//! - `AuthError`: session acquisition failures
//! - `FetchError`: post fetcher precondition failures
//! - `RenderError`: feed serialization failures
//! - `AppError`: Application layer errors (mapped to HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Social platform API client errors
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized - session rejected")]
    Unauthorized,

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Invalid cookies: {0}")]
    InvalidCookies(String),

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Cookie store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cookie file: {0}")]
    Corrupt(String),
}

/// Session acquisition failed: no usable cookies and no complete credentials,
/// or the platform rejected the login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no valid cookies and no complete credentials")]
    NoCredentials,

    #[error("login rejected: {0}")]
    LoginFailed(#[source] PlatformError),

    #[error("could not create platform client: {0}")]
    Client(#[source] PlatformError),
}

/// Post fetcher errors. Upstream failures never surface here; they collapse
/// to an empty result inside the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Feed serialization errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("Generated feed is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Auth(e) => {
                tracing::error!(error = %e, "Platform authentication failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication failed",
                    Some(e.to_string()),
                )
            }
            AppError::Fetch(e) => {
                tracing::error!(error = %e, "Fetch precondition violated");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    Some(e.to_string()),
                )
            }
            AppError::Render(e) => {
                tracing::error!(error = %e, "Feed rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    Some(e.to_string()),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Timeout(_) => {
                tracing::warn!(error = %self, "Request timed out");
                (
                    StatusCode::REQUEST_TIMEOUT,
                    "Request timeout",
                    Some(self.to_string()),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    Some(msg.clone()),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
