use serde::{Deserialize, Serialize};

/// Issuer of every access token
pub const TOKEN_ISSUER: &str = "tubely-access";

/// Claims of a Tubely access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TubelyClaims {
    /// Always `tubely-access`
    pub iss: String,
    /// Caller id (UUID)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}
