//! Error types for the local asset volume

use std::path::PathBuf;

use thiserror::Error;

/// Result type for asset storage operations
pub type AssetStorageResult<T> = Result<T, AssetStorageError>;

/// Errors that can occur while writing assets
#[derive(Error, Debug)]
pub enum AssetStorageError {
    /// Asset name would resolve outside the assets root
    #[error("Invalid asset name: {0}")]
    InvalidName(String),

    /// Assets root could not be created
    #[error("Failed to create assets root {path}: {source}")]
    RootUnavailable {
        /// Assets root
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Asset file could not be written
    #[error("Failed to write asset {path}: {source}")]
    WriteFailed {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}
