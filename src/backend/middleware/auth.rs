/**
 * Authentication Middleware
 *
 * Protects routes that require a bearer token. The middleware reads the
 * `Authorization: Bearer <token>` header, verifies the token with the
 * server's RS256 keys, and attaches the claims to the request extensions
 * where handlers pick them up through the [`AuthUser`] extractor.
 *
 * Failures are answered with 401 and the reason in the JSON error body:
 * - "Invalid authorization header." - header missing or not `Bearer`
 * - "Signature has expired." - token past its `exp`
 * - "Invalid token." - anything else wrong with the token
 */

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::error::AuthError;
use crate::backend::auth::sessions::Claims;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from a verified token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub expires_at: i64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            expires_at: claims.exp,
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::InvalidHeader)?;

    let token = header.strip_prefix("Bearer ").ok_or(AuthError::InvalidHeader)?;
    Ok(token.split(' ').next().unwrap_or_default())
}

/// Authentication middleware
///
/// Returns 401 if the header is malformed or the token does not verify.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers()).map_err(|e| {
        tracing::warn!("[Auth] Rejected request to {}: {}", request.uri().path(), e);
        e
    })?;

    let claims = app_state.jwt.verify(token).map_err(|e| {
        tracing::warn!("[Auth] Invalid token: {}", e);
        e
    })?;

    request.extensions_mut().insert(AuthenticatedUser::from(claims));
    Ok(next.run(request).await)
}

/// Axum extractor for the user attached by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(AuthUser(user.clone()));
        }

        // Route mounted without the middleware: verify here instead
        let token = bearer_token(&parts.headers)?;
        let claims = state.jwt.verify(token)?;
        Ok(AuthUser(claims.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::InvalidHeader));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), Err(AuthError::InvalidHeader));
        assert_eq!(bearer_token(&headers("bearer abc")), Err(AuthError::InvalidHeader));
    }

    #[test]
    fn empty_bearer_token_is_passed_through() {
        assert_eq!(bearer_token(&headers("Bearer ")), Ok(""));
    }
}
