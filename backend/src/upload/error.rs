//! Error types for multipart intake

use std::path::PathBuf;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

use super::UploadKind;

/// Result type for multipart intake
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Errors that can occur while reading an upload
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The form has no part with the expected field name
    #[error("Missing form field: {0}")]
    MissingPart(&'static str),

    /// The multipart body could not be parsed
    #[error("Malformed multipart body: {0}")]
    Malformed(String),

    /// The body exceeded the endpoint's size cap
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The part's declared media type is not accepted by the endpoint
    #[error("Unsupported media type for {kind:?}: {found}")]
    UnsupportedMediaType {
        /// Endpoint the part was sent to
        kind: UploadKind,
        /// Declared media type, empty if none
        found: String,
    },

    /// The payload could not be written to scratch storage
    #[error("Failed to write upload to {path}: {source}")]
    Scratch {
        /// Scratch file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl From<MultipartError> for IntakeError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::Malformed(err.body_text())
        }
    }
}
