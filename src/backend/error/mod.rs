//! Backend Error Module
//!
//! Error types used by HTTP handlers and their conversion to responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Error Types
//!
//! - `HandlerError` - explicit status and message
//! - `TaskError` - task submission and polling
//! - `AuthError` - token and key failures
//! - `SharedError` - request validation
//! - `ConfigError` - startup configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use taskbeat::backend::error::BackendError;
//! use taskbeat::backend::tasks::TaskError;
//!
//! async fn handler() -> Result<String, BackendError> {
//!     Err(TaskError::not_found("4d1c").into())
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
