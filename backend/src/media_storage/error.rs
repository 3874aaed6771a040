//! Error types for bucket operations

use aws_sdk_s3::{error::SdkError, operation::put_object::PutObjectError};
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    /// Local payload could not be read
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<SdkError<PutObjectError>> for BucketError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        match error {
            SdkError::ServiceError(err) => Self::S3Error(format!("{:?}", err.err())),
            _ => Self::AwsError(error.to_string()),
        }
    }
}
