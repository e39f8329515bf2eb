use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// The secret and algorithm are fixed for the life of the process; changing the
/// secret invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenService {
    /// Builds a token service from a shared secret.
    ///
    /// Only the HMAC algorithms are accepted; anything asymmetric is reported as an
    /// internal error since the service holds a single symmetric key.
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        default_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Internal(format!(
                "Unsupported token algorithm {:?}; expected HS256, HS384 or HS512",
                algorithm
            )));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            default_ttl,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Signs a token for `user_id` expiring after `ttl`, or after the configured
    /// default when `ttl` is `None`.
    pub fn issue(&self, user_id: Uuid, ttl: Option<Duration>) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiration = now + ttl.unwrap_or(self.default_ttl);

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry and returns the claims.
    ///
    /// Every failure (malformed, wrong signature, wrong algorithm, expired) maps to
    /// `AuthError::InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token verification failed: {}", e);
                AuthError::InvalidToken
            })
    }
}
