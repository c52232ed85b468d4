//! Shared Module
//!
//! This module contains types that do not depend on the server runtime:
//! task status values exchanged over HTTP, application configuration and
//! request validation errors.
//!
//! # Overview
//!
//! Everything here is plain data plus `serde` derives, so it can be used by
//! clients and tests without enabling the `ssr` feature.

/// Task status and receipts
pub mod task;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use task::{TaskId, TaskReceipt, TaskStatus, WorkKind, ExecutionMedium};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, AppEnvironment, ConfigError};
