mod thumbnail;
mod video;

use axum::http::StatusCode;
use uuid::Uuid;
use video_storage::video::VideoRepository;

use crate::{middleware::AuthenticatedUser, types::AppError};

pub use thumbnail::upload_thumbnail;
pub use video::upload_video;

/// Checks that `video_id` exists and that `user` owns it
async fn ensure_owner(
    videos: &dyn VideoRepository,
    video_id: Uuid,
    user: AuthenticatedUser,
) -> Result<(), AppError> {
    let video = videos.get(video_id).await?.ok_or_else(|| {
        AppError::new(StatusCode::NOT_FOUND, "video_not_found", "Couldn't find video")
    })?;

    if video.owner_id != user.user_id {
        return Err(AppError::new(
            StatusCode::UNAUTHORIZED,
            "not_owner",
            "You don't have permission to upload for this video",
        ));
    }

    Ok(())
}
