//! Multipart intake for thumbnail and video uploads
//!
//! The body cap is enforced by the multipart reader itself (see `UploadLimits`), so
//! reading past it surfaces as `IntakeError::PayloadTooLarge`. The declared media type
//! comes from the part's own `Content-Type`, never the request's.

mod error;

use std::path::Path;

use axum::extract::Multipart;
use tokio::io::AsyncWriteExt;

pub use error::{IntakeError, IntakeResult};

/// Thumbnail cap: 10 MiB
pub const MAX_THUMBNAIL_SIZE_BYTES: usize = 10 << 20;

/// Video cap: 1 GiB
pub const MAX_VIDEO_SIZE_BYTES: usize = 1 << 30;

/// Endpoint body caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Cap of the thumbnail upload body
    pub thumbnail_bytes: usize,
    /// Cap of the video upload body
    pub video_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            thumbnail_bytes: MAX_THUMBNAIL_SIZE_BYTES,
            video_bytes: MAX_VIDEO_SIZE_BYTES,
        }
    }
}

/// Media types the service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `video/mp4`
    Mp4,
}

impl MediaType {
    /// Parses a `Content-Type` value, ignoring parameters and case
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let parsed: mime::Mime = content_type.parse().ok()?;

        match parsed.essence_str().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "video/mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    /// File extension of stored assets
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Mp4 => "mp4",
        }
    }

    /// Canonical `type/subtype`
    #[must_use]
    pub const fn essence(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Mp4 => "video/mp4",
        }
    }
}

/// The two upload endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// JPEG or PNG in the `thumbnail` field
    Thumbnail,
    /// MP4 in the `video` field
    Video,
}

impl UploadKind {
    /// Form field carrying the payload
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Video => "video",
        }
    }

    /// Body cap of this endpoint
    #[must_use]
    pub const fn size_limit(self, limits: UploadLimits) -> usize {
        match self {
            Self::Thumbnail => limits.thumbnail_bytes,
            Self::Video => limits.video_bytes,
        }
    }

    /// Whether this endpoint accepts `media_type`
    #[must_use]
    pub const fn accepts(self, media_type: MediaType) -> bool {
        matches!(
            (self, media_type),
            (Self::Thumbnail, MediaType::Jpeg | MediaType::Png) | (Self::Video, MediaType::Mp4)
        )
    }

    /// Client-facing message for a rejected media type
    #[must_use]
    pub const fn unsupported_media_type_message(self) -> &'static str {
        match self {
            Self::Thumbnail => "Invalid media type. Only JPEG and PNG are allowed",
            Self::Video => "Invalid media type. Only MP4 are allowed",
        }
    }

    /// Validates a declared part content type against the allow-list
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::UnsupportedMediaType` if the type is missing, unparseable or not
    /// accepted by this endpoint
    pub fn validate(self, content_type: Option<&str>) -> IntakeResult<MediaType> {
        content_type
            .and_then(MediaType::from_content_type)
            .filter(|media_type| self.accepts(*media_type))
            .ok_or_else(|| IntakeError::UnsupportedMediaType {
                kind: self,
                found: content_type.unwrap_or_default().to_string(),
            })
    }
}

/// A fully materialized upload part
#[derive(Debug)]
pub struct UploadedPart {
    /// Part payload
    pub bytes: Vec<u8>,
    /// Validated declared media type
    pub media_type: MediaType,
}

/// Locates the `kind` field, validates its media type and buffers its payload.
///
/// # Errors
///
/// Returns an `IntakeError` if the body is malformed or too large, the field is missing,
/// or its media type is not accepted
pub async fn accept(mut multipart: Multipart, kind: UploadKind) -> IntakeResult<UploadedPart> {
    let field_name = kind.field_name();

    loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(IntakeError::MissingPart(field_name));
        };
        if field.name() != Some(field_name) {
            continue;
        }

        let media_type = kind.validate(field.content_type())?;
        let bytes = field.bytes().await?.to_vec();
        drain(&mut multipart).await?;

        tracing::debug!(size = bytes.len(), media_type = media_type.essence(), "part accepted");
        return Ok(UploadedPart { bytes, media_type });
    }
}

/// Locates the `kind` field, validates its media type and streams its payload into `path`.
///
/// The caller owns `path` and its cleanup; on error it may hold a partial payload.
///
/// # Errors
///
/// Returns an `IntakeError` if the body is malformed or too large, the field is missing,
/// its media type is not accepted, or the file cannot be written
pub async fn accept_to_file(
    mut multipart: Multipart,
    kind: UploadKind,
    path: &Path,
) -> IntakeResult<MediaType> {
    let field_name = kind.field_name();
    let scratch_error = |source: std::io::Error| IntakeError::Scratch {
        path: path.to_path_buf(),
        source,
    };

    loop {
        let Some(mut field) = multipart.next_field().await? else {
            return Err(IntakeError::MissingPart(field_name));
        };
        if field.name() != Some(field_name) {
            continue;
        }

        let media_type = kind.validate(field.content_type())?;

        let mut file = tokio::fs::File::create(path).await.map_err(scratch_error)?;
        let mut size = 0usize;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len();
            file.write_all(&chunk).await.map_err(scratch_error)?;
        }
        file.flush().await.map_err(scratch_error)?;
        drop(file);
        drop(field);

        drain(&mut multipart).await?;

        tracing::debug!(size, media_type = media_type.essence(), "part streamed to scratch");
        return Ok(media_type);
    }
}

/// Reads the remaining parts so the body cap also covers trailing data
async fn drain(multipart: &mut Multipart) -> IntakeResult<()> {
    while let Some(mut field) = multipart.next_field().await? {
        while field.chunk().await?.is_some() {}
    }
    Ok(())
}
