/**
 * Verify Token Handler
 *
 * POST /v1/jwt/verify-token decodes a token and returns its claims. Expired
 * and otherwise invalid tokens are told apart in the 401 body.
 */

use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::backend::auth::handlers::types::{VerifyTokenRequest, VerifyTokenResponse};
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::error::BackendError;

/// Verify token handler
///
/// # Errors
///
/// * `401 Unauthorized` - "Signature has expired." or "Invalid token."
///
/// # Example Response
///
/// ```json
/// { "decoded_payload": { "user_id": "alice", "exp": 1767225600 } }
/// ```
pub async fn verify_token(
    State(jwt): State<Arc<JwtKeys>>,
    Json(request): Json<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, BackendError> {
    let claims = jwt.verify(&request.token)?;
    Ok(Json(VerifyTokenResponse { decoded_payload: claims }))
}
