//! JWT Handlers Module
//!
//! HTTP handlers for the `/v1/jwt` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Request and response types
//! ├── generate.rs   - Token issuing
//! ├── verify.rs     - Token verification
//! └── protected.rs  - Bearer-protected echo of the user id
//! ```
//!
//! # Handlers
//!
//! - **`generate_token`** - POST /v1/jwt/generate-token
//! - **`verify_token`** - POST /v1/jwt/verify-token
//! - **`protected`** - GET /v1/jwt/protected
//!
//! # Example
//!
//! ```rust,no_run
//! use taskbeat::backend::auth::handlers::{generate_token, verify_token};
//! use taskbeat::backend::server::state::AppState;
//! use axum::{routing::post, Router};
//!
//! # fn example() -> Router<AppState> {
//! Router::new()
//!     .route("/generate-token", post(generate_token))
//!     .route("/verify-token", post(verify_token))
//! # }
//! ```

/// Request and response types
pub mod types;

/// Token issuing handler
pub mod generate;

/// Token verification handler
pub mod verify;

/// Protected route handler
pub mod protected;

pub use types::{GenerateTokenRequest, ProtectedResponse, TokenResponse, VerifyTokenRequest, VerifyTokenResponse};

pub use generate::generate_token;
pub use protected::protected;
pub use verify::verify_token;
