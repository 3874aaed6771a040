use std::sync::Arc;

use aide::OperationIo;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use crate::{
    jwt::{bearer_token, JwtManager},
    types::AppError,
};

/// Authenticated user information extracted from JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq, OperationIo)]
pub struct AuthenticatedUser {
    /// The caller id from the JWT subject
    pub user_id: Uuid,
}

/// Axum extractor for authenticated user
///
/// Reads the bearer token and verifies it with the `JwtManager` extension. A missing or
/// malformed header and a token that fails verification are both 401, with distinct
/// messages.
///
/// ```ignore
/// async fn protected_handler(
///     VideoId(video_id): VideoId,
///     user: AuthenticatedUser,
/// ) -> Result<impl IntoResponse, AppError> {
///     Ok(format!("{} owns {video_id}?", user.user_id))
/// }
/// ```
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jwt_manager = parts
            .extensions
            .get::<Arc<JwtManager>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("JwtManager extension is not installed");
                AppError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            })?;

        let token = bearer_token(&parts.headers)?;
        let user_id = jwt_manager.validate(token)?;

        Ok(Self { user_id })
    }
}
