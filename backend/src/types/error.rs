//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use video_storage::video::VideoStorageError;

use crate::{
    asset_storage::AssetStorageError,
    jwt::error::JwtError,
    media_processing::MediaProcessingError,
    media_storage::BucketError,
    upload::IntakeError,
};

/// API error response envelope
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, code: &'static str, msg: &'static str) -> Self {
        Self {
            status,
            code,
            inner: ApiErrorResponse { error: msg },
        }
    }

    /// 500 with a terse message; the cause is logged by the caller
    #[must_use]
    pub const fn internal(code: &'static str, msg: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, msg)
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code, logged with the response
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Message sent to the client
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.inner.error
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.code, self.inner.error),
            500..=599 => tracing::error!("Server error: {} - {}", self.code, self.inner.error),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert JWT errors to application errors
impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match &err {
            JwtError::MissingToken => Self::new(
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Couldn't find JWT",
            ),
            JwtError::InvalidToken(reason) => {
                tracing::debug!("Token rejected: {reason}");
                Self::new(
                    StatusCode::UNAUTHORIZED,
                    "invalid_token",
                    "Couldn't validate JWT",
                )
            }
            JwtError::EncodingError(e) => {
                tracing::error!("Token encoding failed: {e}");
                Self::internal("internal_error", "Couldn't issue JWT")
            }
        }
    }
}

/// Convert intake errors to application errors
impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match &err {
            IntakeError::MissingPart(_) | IntakeError::Malformed(_) => {
                tracing::debug!("{err}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_form",
                    "Unable to parse form file",
                )
            }
            IntakeError::PayloadTooLarge(_) => Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "Upload exceeds the size limit",
            ),
            IntakeError::UnsupportedMediaType { kind, found } => {
                tracing::debug!("Rejected media type {found:?}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "unsupported_media_type",
                    kind.unsupported_media_type_message(),
                )
            }
            IntakeError::Scratch { .. } => {
                tracing::error!("{err}");
                Self::internal("scratch_error", "Couldn't write file")
            }
        }
    }
}

/// Convert asset storage errors to application errors
impl From<AssetStorageError> for AppError {
    fn from(err: AssetStorageError) -> Self {
        tracing::error!("Asset storage error: {err}");
        Self::internal("asset_storage_error", "Couldn't write file")
    }
}

/// Convert media processing errors to application errors
impl From<MediaProcessingError> for AppError {
    fn from(err: MediaProcessingError) -> Self {
        tracing::error!("{err}\n{}", err.tool_output());
        match err {
            MediaProcessingError::Probe { .. } => {
                Self::internal("probe_error", "Couldn't get video aspect ratio")
            }
            MediaProcessingError::Remux { .. } => {
                Self::internal("remux_error", "Couldn't process video for fast start")
            }
        }
    }
}

/// Convert bucket errors to application errors
impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        match &err {
            BucketError::UpstreamError(msg) => tracing::error!("S3 upstream error: {msg}"),
            BucketError::S3Error(msg) | BucketError::AwsError(msg) => {
                tracing::error!("S3/AWS error: {msg}");
            }
            BucketError::InvalidInput(msg) => tracing::error!("Unreadable upload: {msg}"),
        }
        Self::internal("object_storage_error", "Couldn't upload video to S3")
    }
}

/// Convert video storage errors to application errors
impl From<VideoStorageError> for AppError {
    fn from(err: VideoStorageError) -> Self {
        tracing::error!("Video storage error: {err}");
        match err {
            VideoStorageError::DynamoDbGetError(_) => {
                Self::internal("metadata_error", "Couldn't find video")
            }
            _ => Self::internal("metadata_error", "Couldn't update video metadata"),
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;
    use crate::upload::UploadKind;

    #[tokio::test]
    async fn test_response_body() {
        let response = AppError::new(StatusCode::BAD_REQUEST, "invalid_id", "Invalid ID")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid ID" }));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(JwtError::MissingToken), StatusCode::UNAUTHORIZED),
            (
                AppError::from(JwtError::InvalidToken("expired".into())),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::from(IntakeError::PayloadTooLarge("length limit exceeded".into())),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                AppError::from(IntakeError::MissingPart("thumbnail")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(IntakeError::UnsupportedMediaType {
                    kind: UploadKind::Video,
                    found: "image/png".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(MediaProcessingError::Probe {
                    reason: "no streams".into(),
                    output: String::new(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(BucketError::UpstreamError("503".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(VideoStorageError::VideoNotFound(uuid::Uuid::nil())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{}", error.code());
        }
    }

    #[test]
    fn test_media_type_messages() {
        let thumbnail = AppError::from(IntakeError::UnsupportedMediaType {
            kind: UploadKind::Thumbnail,
            found: "image/gif".into(),
        });
        let video = AppError::from(IntakeError::UnsupportedMediaType {
            kind: UploadKind::Video,
            found: "video/webm".into(),
        });

        assert_eq!(
            thumbnail.message(),
            "Invalid media type. Only JPEG and PNG are allowed"
        );
        assert_eq!(video.message(), "Invalid media type. Only MP4 are allowed");
    }
}
