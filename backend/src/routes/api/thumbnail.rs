use std::sync::Arc;

use axum::{Extension, Json};
use tracing::instrument;
use video_storage::video::{UrlField, Video, VideoRepository};

use crate::{
    asset_name,
    asset_storage::AssetStorage,
    middleware::AuthenticatedUser,
    types::{AppError, MultipartForm, VideoId},
    upload::{self, UploadKind},
};

use super::ensure_owner;

/// Upload a thumbnail
///
/// Accepts a JPEG or PNG in the `thumbnail` form field, stores it on the asset volume
/// under a fresh random name and records its public URL on the video.
///
/// # Errors
///
/// - 400 for a malformed video id, form or media type
/// - 401 for a missing or invalid token, or if the caller does not own the video
/// - 404 if the video does not exist
/// - 413 if the body exceeds the thumbnail cap
/// - 500 if the asset or the metadata cannot be written
#[instrument(skip_all, fields(video_id = %video_id, user_id = %user.user_id))]
pub async fn upload_thumbnail(
    VideoId(video_id): VideoId,
    user: AuthenticatedUser,
    Extension(videos): Extension<Arc<dyn VideoRepository>>,
    Extension(asset_storage): Extension<Arc<AssetStorage>>,
    MultipartForm(multipart): MultipartForm,
) -> Result<Json<Video>, AppError> {
    let part = upload::accept(multipart, UploadKind::Thumbnail).await?;

    ensure_owner(videos.as_ref(), video_id, user).await?;

    let name = asset_name::mint(part.media_type.extension());
    let url = asset_storage.put(&part.bytes, &name).await?;

    let video = videos.set_url(video_id, UrlField::Thumbnail, &url).await?;

    tracing::info!(thumbnail_url = video.thumbnail_url.as_deref(), "thumbnail uploaded");
    Ok(Json(video))
}
