//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer-token verification for protected routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use taskbeat::backend::middleware::auth_middleware;
//! use taskbeat::backend::server::state::AppState;
//!
//! # fn example(state: AppState) -> Router {
//! Router::new()
//!     .route("/protected", get(|| async { "ok" }))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
//!     .with_state(state)
//! # }
//! ```

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthUser, AuthenticatedUser};
