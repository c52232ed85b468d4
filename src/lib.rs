//! taskbeat - Main Library
//!
//! taskbeat is a demonstration backend built around two pieces of
//! concurrency coordination: a poll-based background task dispatcher and a
//! heartbeat-driven WebSocket session supervisor.
//!
//! # Overview
//!
//! This library provides:
//! - Task submission onto a bounded worker pool or a deferred background slot
//! - Read-once task status polling
//! - WebSocket sessions with a sliding heartbeat window
//! - RS256 JWT issuing and verification for the WebSocket gate
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the server runtime
//!   - Task status and receipts
//!   - Configuration and its builder
//!   - Validation errors
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Axum router, application state and error mapping
//!   - Task registry, worker pool and dispatcher
//!   - Session supervisor and keepalive loop
//!   - JWT keys and handlers
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the server modules and the
//!   `taskbeat-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use taskbeat::backend::server::init::create_app;
//! use taskbeat::shared::AppConfig;
//!
//! # async fn example() -> Result<(), taskbeat::backend::BackendError> {
//! let app = create_app(AppConfig::default()).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

pub mod shared;

pub mod backend;
