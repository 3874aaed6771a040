use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use video_storage::video::VideoRepository;

use crate::routes;
use crate::{
    asset_storage::AssetStorage, jwt::JwtManager, media_processing::VideoProcessor,
    media_storage::ObjectStore, types::Environment, upload::UploadLimits,
};

/// Process-wide collaborators handed to every request
pub struct Services {
    /// Verifies bearer tokens
    pub jwt_manager: Arc<JwtManager>,
    /// Local thumbnail volume
    pub asset_storage: Arc<AssetStorage>,
    /// Remote video store
    pub media_storage: Arc<dyn ObjectStore>,
    /// Video metadata
    pub videos: Arc<dyn VideoRepository>,
    /// Probe, remux and scratch files
    pub video_processor: Arc<VideoProcessor>,
}

/// Builds the application router with its extensions installed
pub fn router(environment: Environment, limits: UploadLimits, services: Services) -> Router {
    let mut openapi = OpenApi::default();

    routes::handler(environment, limits)
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(services.jwt_manager))
        .layer(Extension(services.asset_storage))
        .layer(Extension(services.media_storage))
        .layer(Extension(services.videos))
        .layer(Extension(services.video_processor))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(environment: Environment, services: Services) -> anyhow::Result<()> {
    let router = router(environment, UploadLimits::default(), services)
        .layer(TimeoutLayer::new(environment.request_timeout()));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], environment.port()));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Tubely started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down");
}
