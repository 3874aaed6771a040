//! Custom extractors for request validation

use aide::operation::OperationInput;
use aide::OperationOutput;
use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use crate::types::error::AppError;

/// Video id from the `{video_id}` path segment, rejected with 400 if it is not a UUID
#[derive(Debug, Clone, Copy)]
pub struct VideoId(pub Uuid);

impl<S> FromRequestParts<S> for VideoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid_id = || AppError::new(StatusCode::BAD_REQUEST, "invalid_id", "Invalid ID");

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;

        Uuid::parse_str(&raw).map(Self).map_err(|_| invalid_id())
    }
}

impl OperationInput for VideoId {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Path::<Uuid>::operation_input(ctx, operation);
    }
}

/// Multipart body whose rejection is an `AppError`
pub struct MultipartForm(pub Multipart);

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection| {
                tracing::debug!("Multipart rejected: {rejection}");
                AppError::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_form",
                    "Unable to parse form file",
                )
            })
    }
}

impl OperationInput for MultipartForm {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Multipart::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        // Document form and size errors
        AppError::inferred_responses(ctx, operation)
    }
}
