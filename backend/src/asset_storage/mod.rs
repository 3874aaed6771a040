//! Local asset volume for thumbnails
//!
//! Thumbnails are small and re-uploadable, so they live on a local directory that a
//! static file server exposes under `/assets/`. Writes replace existing files and are not
//! fsynced.
mod error;

use std::path::{Path, PathBuf};

pub use error::{AssetStorageError, AssetStorageResult};

/// Writes thumbnails below the assets root and derives their public URLs
#[derive(Debug, Clone)]
pub struct AssetStorage {
    root: PathBuf,
    public_base_url: String,
}

impl AssetStorage {
    /// Creates the asset storage, creating the root directory if needed
    ///
    /// # Arguments
    ///
    /// * `root` - Directory holding the assets
    /// * `public_base_url` - URL the static server exposes the root under, e.g.
    ///   `http://localhost:8091/assets`
    ///
    /// # Errors
    ///
    /// Returns `AssetStorageError::RootUnavailable` if the directory cannot be created
    pub async fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> AssetStorageResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| AssetStorageError::RootUnavailable {
                path: root.clone(),
                source,
            })?;

        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
        })
    }

    /// Directory holding the assets
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to `{root}/{name}` and returns the public URL
    ///
    /// # Errors
    ///
    /// Returns `AssetStorageError::InvalidName` if `name` is not a single path segment,
    /// `AssetStorageError::WriteFailed` if the file cannot be written
    pub async fn put(&self, bytes: &[u8], name: &str) -> AssetStorageResult<String> {
        let path = self.asset_path(name)?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| AssetStorageError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "asset written");

        Ok(self.public_url(name))
    }

    /// Public URL of an asset name
    #[must_use]
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{name}", self.public_base_url.trim_end_matches('/'))
    }

    fn asset_path(&self, name: &str) -> AssetStorageResult<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.starts_with('.')
        {
            return Err(AssetStorageError::InvalidName(name.to_string()));
        }

        Ok(self.root.join(name))
    }
}
