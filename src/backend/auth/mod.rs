//! Authentication Module
//!
//! RS256 JWT support: issuing and verifying tokens, and the HTTP handlers
//! that expose both. The same verifier gates WebSocket sessions.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── error.rs        - AuthError
//! ├── sessions.rs     - JwtKeys and Claims
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs
//!     ├── types.rs
//!     ├── generate.rs
//!     ├── verify.rs
//!     └── protected.rs
//! ```
//!
//! # Token Flow
//!
//! 1. **Generate**: client posts a user id and receives a 30 minute token
//! 2. **Connect**: client opens `/v1/websocket/ws?token=<token>`
//! 3. **Verify**: the server checks signature and expiry; failures close the
//!    socket with 1008 and the reason
//!
//! # Keys
//!
//! Keys are PEM files read once at startup (`keys/private.pem` and
//! `keys/public.pem` by default). A missing or unreadable key stops startup.

pub mod error;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for the JWT endpoints
pub mod handlers;

pub use error::AuthError;
pub use handlers::{generate_token, protected, verify_token};
pub use sessions::{Claims, JwtKeys};
