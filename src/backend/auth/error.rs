/**
 * Authentication Errors
 *
 * The `Display` text of the client-facing variants is the exact reason sent
 * back to callers, both in 401 bodies and in WebSocket 1008 close frames.
 */

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token was well formed and correctly signed but is past `exp`
    #[error("Signature has expired.")]
    Expired,

    /// Malformed token, bad signature, wrong algorithm or missing claims
    #[error("Invalid token.")]
    Invalid,

    /// `Authorization` header missing or not of the form `Bearer <token>`
    #[error("Invalid authorization header.")]
    InvalidHeader,

    /// A PEM key could not be read or parsed at startup
    #[error("failed to load key {path}: {message}")]
    KeyLoad {
        path: String,
        message: String,
    },

    /// Token encoding failed
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Whether the caller is at fault (401) rather than the server (500)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Expired | Self::Invalid | Self::InvalidHeader)
    }
}
