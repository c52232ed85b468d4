/**
 * JWT Keys and Tokens
 *
 * RS256 token issuing and verification. Tokens are signed with the private
 * key in `keys/private.pem` and verified with the matching public key in
 * `keys/public.pem` (both paths configurable).
 *
 * # Claims
 *
 * ```json
 * { "user_id": "alice", "exp": 1767225600 }
 * ```
 *
 * `exp` is checked with no leeway: a token is expired from its `exp` second on.
 */

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::backend::auth::error::AuthError;
use crate::shared::config::JwtSettings;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued for
    pub user_id: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// RSA key pair plus token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Build keys from PEM text (PKCS#1 or PKCS#8 private key, SPKI public key)
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|e| AuthError::KeyLoad {
            path: "<private key>".to_string(),
            message: e.to_string(),
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|e| AuthError::KeyLoad {
            path: "<public key>".to_string(),
            message: e.to_string(),
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;

        Ok(Self {
            encoding,
            decoding,
            validation,
            ttl,
        })
    }

    /// Read both keys from the configured paths
    pub fn load(settings: &JwtSettings) -> Result<Self, AuthError> {
        let private_pem = read_key(&settings.private_key_path)?;
        let public_pem = read_key(&settings.public_key_path)?;
        let keys = Self::from_pem(&private_pem, &public_pem, settings.token_ttl)?;
        tracing::info!(
            "[Auth] Loaded RS256 keys from {} and {}",
            settings.private_key_path.display(),
            settings.public_key_path.display()
        );
        Ok(keys)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` that expires after the configured TTL
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(self.ttl).map_err(|e| AuthError::Signing(e.to_string()))?;
        let exp = (Utc::now() + ttl).timestamp();
        self.issue_with_expiry(user_id, exp)
    }

    /// Issue a token with an explicit `exp`
    pub fn issue_with_expiry(&self, user_id: &str, exp: i64) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: user_id.to_string(),
            exp,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry and return the claims
    ///
    /// # Errors
    ///
    /// * `AuthError::Expired` - the token is past `exp`
    /// * `AuthError::Invalid` - anything else
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => {
                    tracing::debug!("[Auth] Token rejected: {}", e);
                    AuthError::Invalid
                }
            })
    }
}

fn read_key(path: &Path) -> Result<Vec<u8>, AuthError> {
    std::fs::read(path).map_err(|e| AuthError::KeyLoad {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
