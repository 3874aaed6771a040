use aide::axum::IntoApiResponse;
use axum::Json;
use schemars::JsonSchema;
use serde::Serialize;

/// Liveness of the upload service
#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests
    status: &'static str,
    /// Crate version of the running `tubely` binary
    semver: &'static str,
    /// `GIT_REV` baked in at build time
    rev: Option<&'static str>,
}

/// Health check
///
/// Answers without touching the asset volume, S3, `DynamoDB` or the media tools, so it
/// reports process liveness only.
#[allow(clippy::unused_async)]
pub async fn handler() -> impl IntoApiResponse {
    Json(HealthResponse {
        status: "ok",
        semver: env!("CARGO_PKG_VERSION"),
        rev: option_env!("GIT_REV"),
    })
}
