//! Access token issuing and validation (HS256).
//!
//! Tokens are signed with a process-held secret. The subject carries the caller's user id,
//! the issuer is always `tubely-access`.

pub mod error;
mod types;


use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

pub use types::{TubelyClaims, TOKEN_ISSUER};

use error::JwtError;

/// JWT manager backed by a shared HMAC secret
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    /// Creates a new JWT manager from the signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues an HS256 token for `user_id`, valid for `expires_in`
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if the token cannot be signed
    pub fn issue_token(&self, user_id: Uuid, expires_in: Duration) -> Result<String, JwtError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(expires_in.as_secs()).unwrap_or(i64::MAX);

        let claims = TubelyClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verifies `token` and returns the caller id from its subject
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidToken` if the signature, algorithm, issuer or expiry check
    /// fails, or if the subject is not a UUID
    pub fn validate(&self, token: &str) -> Result<Uuid, JwtError> {
        let data = decode::<TubelyClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|e| JwtError::InvalidToken(format!("subject is not a user id: {e}")))
    }
}

/// Extracts the bearer token from the authorization header
///
/// # Errors
///
/// Returns `JwtError::MissingToken` if the header is absent, not ASCII, not a `Bearer`
/// credential, or carries an empty token
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, JwtError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(JwtError::MissingToken)
}
