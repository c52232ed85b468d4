/**
 * JWT Handler Types
 *
 * Request and response bodies for the `/v1/jwt` endpoints.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::sessions::Claims;

/// Generate token request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct GenerateTokenRequest {
    /// Subject to issue the token for; must not be blank
    #[serde(default)]
    pub user_id: String,
}

/// Verify token request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct VerifyTokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Token response
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    /// RS256 JWT, valid for the configured TTL (30 minutes by default)
    pub token: String,
}

/// Verify token response
#[derive(Serialize, Deserialize, Debug)]
pub struct VerifyTokenResponse {
    pub decoded_payload: Claims,
}

/// Protected route response
#[derive(Serialize, Deserialize, Debug)]
pub struct ProtectedResponse {
    pub user_id: String,
}
