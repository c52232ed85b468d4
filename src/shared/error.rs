//! Shared Error Types
//!
//! Errors raised while validating or decoding request payloads. They carry
//! no transport details; the backend maps them to HTTP responses.
//!
//! # Error Categories
//!
//! - `ValidationError` - a request field failed validation
//!
//! # Usage
//!
//! ```rust
//! use taskbeat::shared::error::SharedError;
//!
//! let error = SharedError::validation("user_id", "must not be blank");
//! ```
use thiserror::Error;

/// Request-level errors shared by handlers and clients
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let SharedError::ValidationError { field, message } = SharedError::validation("user_id", "must not be blank");
        assert_eq!(field, "user_id");
        assert_eq!(message, "must not be blank");
    }

    #[test]
    fn test_error_display() {
        let error = SharedError::validation("user_id", "must not be blank");
        assert_eq!(error.to_string(), "Validation error in field 'user_id': must not be blank");
    }
}
