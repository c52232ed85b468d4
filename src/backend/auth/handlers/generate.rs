/**
 * Generate Token Handler
 *
 * POST /v1/jwt/generate-token issues an RS256 token for the given user id.
 * This is a development convenience: there are no credentials to check.
 */

use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::backend::auth::handlers::types::{GenerateTokenRequest, TokenResponse};
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::error::BackendError;
use crate::shared::SharedError;

/// Generate token handler
///
/// # Errors
///
/// * `400 Bad Request` - `user_id` is missing or blank
/// * `500 Internal Server Error` - signing failed
///
/// # Example Request
///
/// ```http
/// POST /v1/jwt/generate-token HTTP/1.1
/// Content-Type: application/json
///
/// { "user_id": "alice" }
/// ```
///
/// # Example Response
///
/// ```json
/// { "token": "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9..." }
/// ```
pub async fn generate_token(
    State(jwt): State<Arc<JwtKeys>>,
    Json(request): Json<GenerateTokenRequest>,
) -> Result<Json<TokenResponse>, BackendError> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(SharedError::validation("user_id", "must not be blank").into());
    }

    let token = jwt.issue(user_id).map_err(|e| {
        tracing::error!("[Auth] Token generation failed: {}", e);
        e
    })?;

    tracing::info!("[Auth] Issued token for {}", user_id);
    Ok(Json(TokenResponse { token }))
}
