use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use tempfile::TempDir;
use tower::ServiceExt;
use tubely::{
    asset_storage::AssetStorage,
    jwt::JwtManager,
    media_processing::{
        mock::{MockAspectClassifier, MockFastStart},
        AspectClass, AspectClassifier, VideoProcessor,
    },
    media_storage::mock::MockObjectStore,
    server::{self, Services},
    types::Environment,
    upload::UploadLimits,
};
use uuid::Uuid;
use video_storage::video::{mock::MockVideoStorage, Video};

use super::{multipart_body, FormPart, BOUNDARY};

pub const TEST_JWT_SECRET: &str = "tubely-test-secret";
pub const TEST_BUCKET: &str = "tubely-test-videos";
pub const TEST_REGION_HOST: &str = "s3.us-east-1.amazonaws.com";
pub const TEST_ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

/// Setup test environment with tracing
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Behaviour of the collaborators behind the router
pub struct TestOptions {
    pub environment: Environment,
    pub limits: UploadLimits,
    /// `None` makes every probe fail
    pub aspect: Option<AspectClass>,
    /// Replaces the fixed-aspect classifier when set
    pub classifier: Option<Arc<dyn AspectClassifier>>,
    pub remux_fails: bool,
    pub store_fails: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            limits: UploadLimits::default(),
            aspect: Some(AspectClass::Landscape),
            classifier: None,
            remux_fails: false,
            store_fails: false,
        }
    }
}

/// Router wired to in-memory collaborators and temporary directories
pub struct TestSetup {
    pub router: Router,
    pub videos: Arc<MockVideoStorage>,
    pub object_store: Arc<MockObjectStore>,
    pub jwt_manager: Arc<JwtManager>,
    pub assets_dir: TempDir,
    pub scratch_dir: TempDir,
}

impl TestSetup {
    pub async fn new() -> Self {
        Self::with_options(TestOptions::default()).await
    }

    pub async fn with_options(options: TestOptions) -> Self {
        setup_test_env();

        let assets_dir = tempfile::tempdir().expect("Failed to create assets dir");
        let scratch_dir = tempfile::tempdir().expect("Failed to create scratch dir");

        let asset_storage = AssetStorage::new(assets_dir.path(), TEST_ASSETS_BASE_URL)
            .await
            .expect("Failed to create asset storage");

        let object_store = Arc::new(if options.store_fails {
            MockObjectStore::failing(TEST_BUCKET, TEST_REGION_HOST)
        } else {
            MockObjectStore::new(TEST_BUCKET, TEST_REGION_HOST)
        });

        let classifier: Arc<dyn AspectClassifier> = match options.classifier {
            Some(classifier) => classifier,
            None => Arc::new(
                options
                    .aspect
                    .map_or_else(MockAspectClassifier::failing, MockAspectClassifier::returning),
            ),
        };
        let transformer = if options.remux_fails {
            MockFastStart::failing()
        } else {
            MockFastStart::new()
        };
        let video_processor = VideoProcessor::new(
            classifier,
            Arc::new(transformer),
            scratch_dir.path().to_path_buf(),
        );

        let videos = Arc::new(MockVideoStorage::new());
        let jwt_manager = Arc::new(JwtManager::new(TEST_JWT_SECRET));

        let router = server::router(
            options.environment,
            options.limits,
            Services {
                jwt_manager: jwt_manager.clone(),
                asset_storage: Arc::new(asset_storage),
                media_storage: object_store.clone(),
                videos: videos.clone(),
                video_processor: Arc::new(video_processor),
            },
        );

        Self {
            router,
            videos,
            object_store,
            jwt_manager,
            assets_dir,
            scratch_dir,
        }
    }

    /// Seeds a video record owned by `owner_id`
    pub fn seed_video(&self, owner_id: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: "Boots".to_string(),
            description: "A walk through the forest".to_string(),
            thumbnail_url: None,
            video_url: None,
            owner_id,
        };
        self.videos.insert(video.clone());
        video
    }

    /// Issues a valid one-hour token for `user_id`
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt_manager
            .issue_token(user_id, Duration::from_secs(3600))
            .expect("Failed to issue token")
    }

    /// Posts a raw multipart body
    pub async fn send_multipart(
        &self,
        route: &str,
        token: Option<&str>,
        body: Vec<u8>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut request = Request::builder()
            .uri(route)
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::from(body))?)
            .await?;
        Ok(response)
    }

    /// Posts a single-part form
    pub async fn send_upload(
        &self,
        route: &str,
        token: Option<&str>,
        part: FormPart<'_>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_multipart(route, token, multipart_body(&[part]))
            .await
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    /// Files currently in the assets directory
    pub fn asset_files(&self) -> Vec<PathBuf> {
        list_dir(&self.assets_dir)
    }

    /// Files currently in the scratch directory
    pub fn scratch_files(&self) -> Vec<PathBuf> {
        list_dir(&self.scratch_dir)
    }
}

fn list_dir(dir: &TempDir) -> Vec<PathBuf> {
    std::fs::read_dir(dir.path())
        .expect("Failed to read dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect()
}

pub fn thumbnail_route(video_id: Uuid) -> String {
    format!("/api/thumbnail_upload/{video_id}")
}

pub fn video_route(video_id: Uuid) -> String {
    format!("/api/video_upload/{video_id}")
}
