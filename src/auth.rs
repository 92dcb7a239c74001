use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::AppConfig, error::ApiError, models::Role};

/// Claims
///
/// The signed payload carried inside every bearer token. The role claim is
/// cleartext (base64, not encrypted) and the token is trusted by signature
/// alone: there is no revocation list, so a leaked token stays valid until
/// its `exp` passes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Role claim used by the authorization guard; read straight from the
    /// token without a database round trip.
    pub role: Role,
    /// Expiration timestamp (seconds).
    pub exp: usize,
    /// Issued-at timestamp (seconds).
    pub iat: usize,
}

/// Lifetime of a token issued by login and register.
pub const SESSION_TTL_HOURS: i64 = 3;
/// Lifetime of a token issued by the superadmin bootstrap path.
pub const BOOTSTRAP_TTL_DAYS: i64 = 30;

/// Signs a token embedding `{sub, role}` with the given lifetime.
pub fn issue_token(
    user_id: Uuid,
    role: Role,
    ttl: Duration,
    secret: &str,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// Hashes a password with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a candidate password against a stored argon2 hash. A malformed
/// stored hash counts as a mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the token subject and
/// the role claim. This is what handlers receive once the extractor has
/// validated the signature; per the trust model, no user lookup happens here,
/// so a deleted user's outstanding token keeps working until expiry.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// The single authorization comparison point: the caller's role must meet
    /// or exceed the minimum. Centralizing this here keeps the admin/superadmin
    /// policy out of individual handlers' string checks.
    pub fn require_role(&self, minimum: Role) -> Result<(), ApiError> {
        if self.role >= minimum {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Requires {minimum} privileges"
            )))
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any guarded handler. Token extraction and signature
/// validation live here; role comparison happens in the handlers via
/// `require_role`.
///
/// Rejection: 401 with a `{"message"}` body on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the signing secret).
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        // Bearer token extraction.
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                // The most common failure for a valid-but-old token.
                ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("Token expired".to_string())
                }
                // Bad signature, malformed token, etc.
                _ => ApiError::Unauthorized("Not authorized, token failed".to_string()),
            }
        })?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}
