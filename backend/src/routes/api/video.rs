use std::sync::Arc;

use axum::{Extension, Json};
use tracing::instrument;
use video_storage::video::{UrlField, Video, VideoRepository};

use crate::{
    asset_name,
    media_processing::VideoProcessor,
    media_storage::ObjectStore,
    middleware::AuthenticatedUser,
    types::{AppError, MultipartForm, VideoId},
    upload::{self, UploadKind},
};

use super::ensure_owner;

/// Upload a video
///
/// Accepts an MP4 in the `video` form field. Ownership is checked before the body is read.
/// The payload is classified by aspect ratio, remuxed for fast start and stored under
/// `{landscape|portrait|other}/{random}.mp4`; the object URL is recorded on the video.
/// Scratch files are removed on every exit path.
///
/// # Errors
///
/// - 400 for a malformed video id, form or media type
/// - 401 for a missing or invalid token, or if the caller does not own the video
/// - 404 if the video does not exist
/// - 413 if the body exceeds the video cap
/// - 500 if probing, remuxing, the upload or the metadata update fails
#[instrument(skip_all, fields(video_id = %video_id, user_id = %user.user_id))]
pub async fn upload_video(
    VideoId(video_id): VideoId,
    user: AuthenticatedUser,
    Extension(videos): Extension<Arc<dyn VideoRepository>>,
    Extension(media_storage): Extension<Arc<dyn ObjectStore>>,
    Extension(processor): Extension<Arc<VideoProcessor>>,
    MultipartForm(multipart): MultipartForm,
) -> Result<Json<Video>, AppError> {
    ensure_owner(videos.as_ref(), video_id, user).await?;

    let mut scratch = processor.scratch_space();
    let upload_path = scratch.reserve("mp4");
    let media_type = upload::accept_to_file(multipart, UploadKind::Video, &upload_path).await?;

    let aspect = processor.probe(&upload_path).await?;
    let processed_path = processor.remux(&mut scratch, &upload_path).await?;

    let key = format!("{}/{}", aspect.prefix(), asset_name::mint(media_type.extension()));
    let url = media_storage
        .put(&processed_path, &key, media_type.essence())
        .await?;

    let video = videos.set_url(video_id, UrlField::Video, &url).await?;

    tracing::info!(%aspect, key, "video uploaded");
    Ok(Json(video))
}
