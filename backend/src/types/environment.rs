//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use tracing::Level;

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
const DEVELOPMENT_JWT_SECRET: &str = "tubely-development-secret";

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Port the server listens on, also used in public asset URLs
    ///
    /// # Panics
    ///
    /// Panics if `PORT` is set but is not a port number
    #[must_use]
    pub fn port(&self) -> u16 {
        env::var("PORT").map_or(DEFAULT_PORT, |port| {
            port.parse().expect("PORT must be a valid port number")
        })
    }

    /// Directory holding thumbnails
    #[must_use]
    pub fn assets_root(&self) -> PathBuf {
        PathBuf::from(var_or("ASSETS_ROOT", "./assets"))
    }

    /// Base URL the static asset server exposes the assets root under
    #[must_use]
    pub fn assets_public_base_url(&self) -> String {
        format!(
            "{}://{}:{}/assets",
            var_or("ASSETS_PUBLIC_SCHEME", "http"),
            var_or("ASSETS_PUBLIC_HOST", "localhost"),
            self.port()
        )
    }

    /// Secret verifying bearer tokens
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set outside development
    #[must_use]
    pub fn jwt_secret(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("JWT_SECRET").expect("JWT_SECRET environment variable is not set")
            }
            Self::Development => var_or("JWT_SECRET", DEVELOPMENT_JWT_SECRET),
        }
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => var_or("S3_BUCKET_NAME", "tubely-videos"),
        }
    }

    /// Region of the video bucket
    #[must_use]
    pub fn s3_region(&self) -> String {
        var_or("S3_REGION", "us-east-1")
    }

    /// Host part of canonical object URLs
    #[must_use]
    pub fn s3_region_host(&self) -> String {
        env::var("S3_REGION_HOST")
            .unwrap_or_else(|_| format!("s3.{}.amazonaws.com", self.s3_region()))
    }

    /// Dynamo DB table holding video records
    #[must_use]
    pub fn videos_table_name(&self) -> String {
        var_or("VIDEOS_TABLE_NAME", "tubely-videos")
    }

    /// `ffprobe` binary
    #[must_use]
    pub fn ffprobe_path(&self) -> String {
        var_or("FFPROBE_PATH", "ffprobe")
    }

    /// `ffmpeg` binary
    #[must_use]
    pub fn ffmpeg_path(&self) -> String {
        var_or("FFMPEG_PATH", "ffmpeg")
    }

    /// Directory for per-request scratch files
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        env::var("SCRATCH_DIR").map_or_else(|_| env::temp_dir(), PathBuf::from)
    }

    /// Whole-request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration, pinned to the bucket region
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();
        builder.set_region(Some(Region::new(self.s3_region())));

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
