//! Error types for video storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    get_item::GetItemError, put_item::PutItemError, update_item::UpdateItemError,
};
use thiserror::Error;
use uuid::Uuid;

/// Result type for video storage operations
pub type VideoStorageResult<T> = Result<T, VideoStorageError>;

/// Errors that can occur during video storage operations
#[derive(Error, Debug)]
pub enum VideoStorageError {
    /// Failed to insert video into Dynamo DB
    #[error("Failed to insert video into DynamoDB: {0}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get video from Dynamo DB
    #[error("Failed to get video from DynamoDB: {0}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to update video in Dynamo DB
    #[error("Failed to update video in DynamoDB: {0}")]
    DynamoDbUpdateError(#[from] SdkError<UpdateItemError>),

    /// Video already exists
    #[error("Video already exists: {0}")]
    VideoExists(Uuid),

    /// Video does not exist
    #[error("Video not found: {0}")]
    VideoNotFound(Uuid),

    /// Serialization error for `serde_dynamo`
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
