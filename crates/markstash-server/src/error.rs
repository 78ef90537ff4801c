//! HTTP error mapping
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! code derived from the engine error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use markstash_core::Error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An error ready to be sent to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Report this failure as a 500 with `context` in front of the message
    ///
    /// Used by endpoints that do not distinguish caller mistakes from
    /// server faults.
    pub fn into_internal(self, context: &str) -> Self {
        Self::internal(format!("{}: {}", context, self.message))
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if let Error::Storage(storage) = &err {
            warn!(
                transient = storage.is_transient(),
                hint = storage.recovery_suggestion().unwrap_or("none"),
                "Backing store failure"
            );
        }

        let status = match &err {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Integrity { .. } | Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        }

        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_per_error_kind() {
        let validation = ApiError::from(Error::Validation("url is required".to_string()));
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.message, "url is required");

        let missing = ApiError::from(Error::NotFound("gone".to_string()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let parse_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let corrupt = ApiError::from(Error::Integrity {
            key: "tags".to_string(),
            source: parse_err,
        });
        assert_eq!(corrupt.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(corrupt.message.contains("'tags'"));
    }

    #[test]
    fn test_storage_failure_is_500() {
        let err = ApiError::from(Error::Storage(markstash_core::StorageError::Poisoned(
            "lock held by panicked thread".to_string(),
        )));

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("poisoned"));
    }

    #[test]
    fn test_into_internal_keeps_message() {
        let err = ApiError::bad_request("url is required").into_internal("Failed to save bookmark");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to save bookmark: url is required");
    }
}
