use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};
use tubely::{
    asset_storage::AssetStorage,
    jwt::JwtManager,
    media_processing::{self, FfmpegFastStart, FfprobeClassifier, VideoProcessor},
    media_storage::MediaStorage,
    server::{self, Services},
    types::Environment,
};
use video_storage::video::VideoStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // Configure logging format based on environment
    // Use JSON format for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(env_filter).init();
        }
        Environment::Development => {
            fmt().with_env_filter(env_filter).init();
        }
    }

    let ffprobe_path = environment.ffprobe_path();
    let ffmpeg_path = environment.ffmpeg_path();
    if !media_processing::run_self_check(&ffprobe_path, &ffmpeg_path).await {
        tracing::error!("Media tools are unavailable, video uploads will fail");
    }

    let scratch_dir = environment.scratch_dir();
    tokio::fs::create_dir_all(&scratch_dir).await?;

    let asset_storage = AssetStorage::new(
        environment.assets_root(),
        environment.assets_public_base_url(),
    )
    .await?;

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let media_storage = MediaStorage::new(
        s3_client,
        environment.s3_bucket(),
        environment.s3_region_host(),
    );

    let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));
    let videos = VideoStorage::new(dynamodb_client, environment.videos_table_name());

    let video_processor = VideoProcessor::new(
        Arc::new(FfprobeClassifier::new(ffprobe_path)),
        Arc::new(FfmpegFastStart::new(ffmpeg_path)),
        scratch_dir,
    );

    let services = Services {
        jwt_manager: Arc::new(JwtManager::new(&environment.jwt_secret())),
        asset_storage: Arc::new(asset_storage),
        media_storage: Arc::new(media_storage),
        videos: Arc::new(videos),
        video_processor: Arc::new(video_processor),
    };

    server::start(environment, services).await
}
