//! Backend Module
//!
//! All server-side code: an Axum HTTP server with poll-based background
//! tasks, heartbeat-driven WebSocket sessions and RS256 JWT support.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`tasks`** - Task registry, worker pool, dispatcher and handlers
//! - **`realtime`** - Session supervisor and the keepalive loop
//! - **`auth`** - JWT keys and handlers
//! - **`middleware`** - Bearer-token middleware and extractor
//! - **`error`** - Backend error type and response conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - taskbeat-server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── tasks/          - Background task dispatch
//! ├── realtime/       - WebSocket sessions
//! ├── auth/           - JWT
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the task dispatcher, the session supervisor, the JWT
//! keys and the configuration. The task registry and the session table each
//! sit behind a single `std::sync::Mutex` that is never held across an
//! `.await`.
//!
//! # Concurrency
//!
//! - Request and connection I/O run on the tokio multi-threaded runtime
//! - CPU-bound work runs on `spawn_blocking` threads, at most `worker_count`
//!   at a time, queued FIFO behind a semaphore
//! - I/O-bound work runs as a spawned tokio task after the request returns
//! - Each WebSocket connection runs its own supervisory loop
//!
//! # Error Handling
//!
//! Handlers return `BackendError`, which renders as
//! `{"error": <message>, "status": <code>}` with the matching status code.

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Poll-based background tasks
#[cfg(feature = "ssr")]
pub mod tasks;

/// Heartbeat-driven WebSocket sessions
#[cfg(feature = "ssr")]
pub mod realtime;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// JWT keys and handlers
#[cfg(feature = "ssr")]
pub mod auth;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use server::{create_app, AppState};
#[cfg(feature = "ssr")]
pub use error::BackendError;
#[cfg(feature = "ssr")]
pub use tasks::{Dispatcher, TaskError, TaskRegistry};
#[cfg(feature = "ssr")]
pub use realtime::SessionSupervisor;
#[cfg(feature = "ssr")]
pub use auth::JwtKeys;
