//! Error types for the log server.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use logscope_core::{IngestError, LogError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the log server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    /// The request carried no usable body.
    #[error("Request body is missing or empty")]
    EmptyBody,

    /// The request body was not valid JSON.
    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    /// The query string could not be decoded.
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    /// The log entry failed validation.
    #[error("Invalid log entry")]
    InvalidLog(ValidationErrors),

    /// The store could not be opened or written.
    #[error("{0}")]
    Store(#[from] LogError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl ServerError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::EmptyBody
            | Self::MalformedBody(_)
            | Self::InvalidQuery(_)
            | Self::InvalidLog(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BindFailed(_, _) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let message = self.to_string();
        let details = match self {
            Self::InvalidLog(errors) => Some(errors.into_messages()),
            _ => None,
        };
        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error"),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ServerError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::EmptyBody => Self::EmptyBody,
            IngestError::Invalid(errors) => Self::InvalidLog(errors),
            IngestError::Persistence(source) => Self::Store(source),
        }
    }
}
