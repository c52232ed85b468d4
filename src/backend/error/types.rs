/**
 * Backend Error Types
 *
 * `BackendError` is what HTTP handlers return. It wraps the domain errors
 * and decides the status code each one is answered with.
 *
 * # Status Code Mapping
 *
 * | Error                              | Status | Message                  |
 * |------------------------------------|--------|--------------------------|
 * | `TaskError::NotFound`              | 400    | Not Found                |
 * | `TaskError::AllocationExhausted`   | 500    | Internal Server Error    |
 * | `TaskError::CapacityRejected`      | 503    | error text               |
 * | `AuthError` (client side)          | 401    | reason text              |
 * | `AuthError` (key load, signing)    | 500    | Internal Server Error    |
 * | `SharedError::ValidationError`     | 400    | error text               |
 * | `ConfigError`                      | 500    | error text               |
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::error::AuthError;
use crate::backend::tasks::error::TaskError;
use crate::shared::{ConfigError, SharedError};

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Task submission or polling failure
    #[error(transparent)]
    TaskError(#[from] TaskError),

    /// Token or key failure
    #[error(transparent)]
    AuthError(#[from] AuthError),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Startup configuration failure
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::TaskError(err) => match err {
                TaskError::NotFound { .. } => StatusCode::BAD_REQUEST,
                TaskError::AllocationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                TaskError::CapacityRejected { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::AuthError(err) if err.is_client_error() => StatusCode::UNAUTHORIZED,
            Self::AuthError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message sent to the client
    ///
    /// Server-side task and key failures are reported generically; the
    /// details go to the log instead.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::TaskError(TaskError::NotFound { .. }) => "Not Found".to_string(),
            Self::TaskError(TaskError::AllocationExhausted { .. }) => "Internal Server Error".to_string(),
            Self::TaskError(err) => err.to_string(),
            Self::AuthError(err) if err.is_client_error() => err.to_string(),
            Self::AuthError(_) => "Internal Server Error".to_string(),
            Self::SharedError(err) => err.to_string(),
            Self::ConfigError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_task_error_mapping() {
        let not_found: BackendError = TaskError::not_found("abc").into();
        assert_eq!(not_found.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found.message(), "Not Found");

        let exhausted: BackendError = TaskError::AllocationExhausted { attempts: 3 }.into();
        assert_eq!(exhausted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(exhausted.message(), "Internal Server Error");

        let saturated: BackendError = TaskError::CapacityRejected { limit: 8 }.into();
        assert_eq!(saturated.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_error_mapping() {
        let expired: BackendError = AuthError::Expired.into();
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.message(), "Signature has expired.");

        let signing: BackendError = AuthError::Signing("rsa failure".into()).into();
        assert_eq!(signing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!signing.message().contains("rsa"));
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("user_id", "must not be blank").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(backend_error.message().contains("user_id"));
    }
}
