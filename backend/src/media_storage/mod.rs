//! S3-based video storage operations
mod error;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{error::SdkError, primitives::ByteStream, Client as S3Client};

pub use error::{BucketError, BucketResult};

/// Durable remote store for processed videos
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the file at `path` under `key` and returns its public URL.
    ///
    /// Retries are the client's responsibility; an error is terminal.
    async fn put(&self, path: &Path, key: &str, content_type: &str) -> BucketResult<String>;
}

/// Video storage client for S3 operations
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    region_host: String,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for video storage
    /// * `region_host` - Host part of canonical object URLs, e.g. `s3.us-east-1.amazonaws.com`
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String, region_host: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            region_host,
        }
    }

    /// Canonical URL of an object: `https://{bucket}.{region_host}/{key}`
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        canonical_object_url(&self.bucket_name, &self.region_host, key)
    }
}

fn canonical_object_url(bucket_name: &str, region_host: &str, key: &str) -> String {
    format!("https://{bucket_name}.{region_host}/{key}")
}

#[async_trait]
impl ObjectStore for MediaStorage {
    #[allow(clippy::cognitive_complexity)]
    async fn put(&self, path: &Path, key: &str, content_type: &str) -> BucketResult<String> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| BucketError::InvalidInput(format!("{}: {e}", path.display())))?;

        let result = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket_name, key, "video object stored");
                Ok(self.object_url(key))
            }
            Err(SdkError::ServiceError(service_err))
                if service_err.raw().status().as_u16() >= 500 =>
            {
                Err(BucketError::UpstreamError(format!("{service_err:?}")))
            }
            Err(e) => Err(BucketError::from(e)),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{canonical_object_url, BucketError, BucketResult, ObjectStore};

    /// Object stored by `MockObjectStore`
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StoredObject {
        pub body: Vec<u8>,
        pub content_type: String,
    }

    /// In-memory object store producing the same URLs as `MediaStorage`
    pub struct MockObjectStore {
        bucket_name: String,
        region_host: String,
        objects: Mutex<HashMap<String, StoredObject>>,
        fail: bool,
    }

    impl MockObjectStore {
        #[must_use]
        pub fn new(bucket_name: &str, region_host: &str) -> Self {
            Self {
                bucket_name: bucket_name.to_string(),
                region_host: region_host.to_string(),
                objects: Mutex::new(HashMap::new()),
                fail: false,
            }
        }

        /// A store whose puts fail like an exhausted S3 client
        #[must_use]
        pub fn failing(bucket_name: &str, region_host: &str) -> Self {
            Self {
                fail: true,
                ..Self::new(bucket_name, region_host)
            }
        }

        /// Stored objects by key
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn objects(&self) -> HashMap<String, StoredObject> {
            self.objects.lock().expect("object store lock poisoned").clone()
        }
    }

    #[async_trait]
    impl ObjectStore for MockObjectStore {
        async fn put(&self, path: &Path, key: &str, content_type: &str) -> BucketResult<String> {
            let body = tokio::fs::read(path)
                .await
                .map_err(|e| BucketError::InvalidInput(format!("{}: {e}", path.display())))?;

            if self.fail {
                return Err(BucketError::UpstreamError("503 Slow Down".to_string()));
            }

            self.objects.lock().expect("object store lock poisoned").insert(
                key.to_string(),
                StoredObject {
                    body,
                    content_type: content_type.to_string(),
                },
            );

            Ok(canonical_object_url(&self.bucket_name, &self.region_host, key))
        }
    }
}
