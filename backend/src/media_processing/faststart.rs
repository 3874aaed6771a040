use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::instrument;

use super::{FastStartTransformer, MediaProcessingError, MediaProcessingResult};

/// Derives the remux output path: `foo.mp4` becomes `foo.processing.mp4`
#[must_use]
pub fn processing_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(".processing.");
    name.push(input.extension().unwrap_or_else(|| OsStr::new("mp4")));
    input.with_file_name(name)
}

/// Fast-start remuxer backed by `ffmpeg`
#[derive(Debug, Clone)]
pub struct FfmpegFastStart {
    ffmpeg_path: String,
}

impl FfmpegFastStart {
    /// Creates a remuxer running the `ffmpeg` binary at `ffmpeg_path`
    #[must_use]
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl FastStartTransformer for FfmpegFastStart {
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    async fn transform(&self, input: &Path, output: &Path) -> MediaProcessingResult<()> {
        let result = Command::new(&self.ffmpeg_path)
            .args(["-nostdin", "-y", "-i"])
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MediaProcessingError::Remux {
                reason: format!("failed to run {}: {e}", self.ffmpeg_path),
                output: String::new(),
            })?;

        if !result.status.success() {
            return Err(MediaProcessingError::Remux {
                reason: format!("ffmpeg exited with {}", result.status),
                output: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        tracing::debug!("video remuxed for fast start");
        Ok(())
    }
}
