//! JWT-related error types

use thiserror::Error;

/// Errors that can occur during JWT operations
#[derive(Error, Debug)]
pub enum JwtError {
    /// No bearer token in the authorization header
    #[error("Missing or malformed bearer token")]
    MissingToken,

    /// Signature, algorithm, issuer, expiry or subject check failed
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    /// JWT encoding failed
    #[error("Failed to encode JWT token")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
}
