mod api;
mod docs;
mod health;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use axum::extract::DefaultBodyLimit;

use crate::{types::Environment, upload::UploadLimits};

/// Creates the router with all handler routes
pub fn handler(environment: Environment, limits: UploadLimits) -> ApiRouter {
    let thumbnail_routes = ApiRouter::new()
        .api_route(
            "/api/thumbnail_upload/{video_id}",
            post(api::upload_thumbnail),
        )
        .layer(DefaultBodyLimit::max(limits.thumbnail_bytes));

    let video_routes = ApiRouter::new()
        .api_route("/api/video_upload/{video_id}", post(api::upload_video))
        .layer(DefaultBodyLimit::max(limits.video_bytes));

    ApiRouter::new()
        .merge(docs::handler(environment))
        .api_route("/health", get(health::handler))
        .merge(thumbnail_routes)
        .merge(video_routes)
}
