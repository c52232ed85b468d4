//! Route Configuration Module
//!
//! Configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, health check, layers
//! └── api_routes.rs   - /v1 route groups
//! ```
//!
//! # Routes
//!
//! - `GET /health_check`
//! - `POST /v1/async/io-bound`, `POST /v1/async/cpu-bound`
//! - `GET /v1/async/result/{task_id}`
//! - `POST /v1/jwt/generate-token`, `POST /v1/jwt/verify-token`
//! - `GET /v1/jwt/protected`
//! - `GET /v1/websocket/ws?token=<jwt>`
//!
//! # Example
//!
//! ```rust,no_run
//! use taskbeat::backend::routes::create_router;
//! use taskbeat::backend::server::state::AppState;
//!
//! # fn example(app_state: AppState) {
//! let router = create_router(app_state);
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
