//! Video record storage integration using Dynamo DB
//!
//! The upload service reads a record to check ownership and writes back the asset URLs
//! once an upload has been committed to durable storage.

mod error;

use std::sync::Arc;

use aws_sdk_dynamodb::{
    error::SdkError,
    types::{AttributeValue, ReturnValue},
    Client as DynamoDbClient,
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

pub use error::{VideoStorageError, VideoStorageResult};

/// Attribute names for the videos table
#[derive(Debug, Clone, Copy, Display)]
#[strum(serialize_all = "snake_case")]
pub enum VideoAttribute {
    /// Video ID (Primary Key)
    Id,
    /// Public thumbnail URL
    ThumbnailUrl,
    /// Public video URL
    VideoUrl,
    /// Owner of the video
    UserId,
}

/// URL attribute written by an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    /// `thumbnail_url`
    Thumbnail,
    /// `video_url`
    Video,
}

impl UrlField {
    /// Table attribute backing this field
    #[must_use]
    pub const fn attribute(self) -> VideoAttribute {
        match self {
            Self::Thumbnail => VideoAttribute::ThumbnailUrl,
            Self::Video => VideoAttribute::VideoUrl,
        }
    }
}

/// Video metadata record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Video {
    /// Video ID (Primary Key)
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last metadata change outside of the upload service
    pub updated_at: DateTime<Utc>,
    /// Title given by the owner
    pub title: String,
    /// Description given by the owner
    pub description: String,
    /// Public URL of the thumbnail, once uploaded
    pub thumbnail_url: Option<String>,
    /// Public URL of the video payload, once uploaded
    pub video_url: Option<String>,
    /// Owner of the video. Never written by the upload service.
    #[serde(rename = "user_id")]
    pub owner_id: Uuid,
}

/// Gateway to the video metadata store
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Loads a video record, `None` if no record has this id
    async fn get(&self, video_id: Uuid) -> VideoStorageResult<Option<Video>>;

    /// Sets one URL attribute of a video and returns the record as stored.
    ///
    /// Only `field` is written, so a concurrent upload of the other asset kind is never
    /// overwritten. Two uploads of the same kind race and the last writer wins.
    async fn set_url(
        &self,
        video_id: Uuid,
        field: UrlField,
        url: &str,
    ) -> VideoStorageResult<Video>;
}

/// Video storage client for Dynamo DB operations
pub struct VideoStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl VideoStorage {
    /// Creates a new video storage client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table name for videos
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }

    /// Inserts a new video record
    ///
    /// # Errors
    ///
    /// Returns `VideoStorageError::VideoExists` if a record with the same id exists,
    /// or another `VideoStorageError` if the Dynamo DB operation fails
    pub async fn insert(&self, video: &Video) -> VideoStorageResult<()> {
        let item = serde_dynamo::to_item(video)
            .map_err(|e| VideoStorageError::SerializationError(e.to_string()))?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", VideoAttribute::Id.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    VideoStorageError::VideoExists(video.id)
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl VideoRepository for VideoStorage {
    async fn get(&self, video_id: Uuid) -> VideoStorageResult<Option<Video>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                VideoAttribute::Id.to_string(),
                AttributeValue::S(video_id.to_string()),
            )
            .send()
            .await?;

        let item = response
            .item()
            .map(|item| serde_dynamo::from_item(item.clone()))
            .transpose()
            .map_err(|e| VideoStorageError::SerializationError(e.to_string()))?;

        Ok(item)
    }

    async fn set_url(
        &self,
        video_id: Uuid,
        field: UrlField,
        url: &str,
    ) -> VideoStorageResult<Video> {
        let response = self
            .dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(
                VideoAttribute::Id.to_string(),
                AttributeValue::S(video_id.to_string()),
            )
            .update_expression("SET #url = :url")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", VideoAttribute::Id.to_string())
            .expression_attribute_names("#url", field.attribute().to_string())
            .expression_attribute_values(":url", AttributeValue::S(url.to_string()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    VideoStorageError::VideoNotFound(video_id)
                } else {
                    err.into()
                }
            })?;

        let item = response
            .attributes()
            .cloned()
            .ok_or(VideoStorageError::VideoNotFound(video_id))?;
        let video = serde_dynamo::from_item(item)
            .map_err(|e| VideoStorageError::SerializationError(e.to_string()))?;

        tracing::debug!(%video_id, attribute = %field.attribute(), "video url committed");

        Ok(video)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use uuid::Uuid;

    use super::{UrlField, Video, VideoRepository, VideoStorageError, VideoStorageResult};

    /// In-memory video repository with the same write semantics as `VideoStorage`
    #[derive(Default)]
    pub struct MockVideoStorage {
        videos: RwLock<HashMap<Uuid, Video>>,
    }

    impl MockVideoStorage {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a record, replacing any record with the same id
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned
        pub fn insert(&self, video: Video) {
            self.videos
                .write()
                .expect("video store lock poisoned")
                .insert(video.id, video);
        }

        /// Returns the stored record without going through the trait
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn snapshot(&self, video_id: Uuid) -> Option<Video> {
            self.videos
                .read()
                .expect("video store lock poisoned")
                .get(&video_id)
                .cloned()
        }
    }

    #[async_trait::async_trait]
    impl VideoRepository for MockVideoStorage {
        async fn get(&self, video_id: Uuid) -> VideoStorageResult<Option<Video>> {
            Ok(self.snapshot(video_id))
        }

        async fn set_url(
            &self,
            video_id: Uuid,
            field: UrlField,
            url: &str,
        ) -> VideoStorageResult<Video> {
            let mut videos = self.videos.write().expect("video store lock poisoned");
            let stored = videos
                .get_mut(&video_id)
                .ok_or(VideoStorageError::VideoNotFound(video_id))?;
            let slot = match field {
                UrlField::Thumbnail => &mut stored.thumbnail_url,
                UrlField::Video => &mut stored.video_url,
            };
            *slot = Some(url.to_string());
            let video = stored.clone();
            drop(videos);
            Ok(video)
        }
    }
}
