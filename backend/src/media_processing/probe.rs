use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::instrument;

use super::{AspectClass, AspectClassifier, MediaProcessingError, MediaProcessingResult};

/// Aspect classifier backed by `ffprobe`
#[derive(Debug, Clone)]
pub struct FfprobeClassifier {
    ffprobe_path: String,
}

impl FfprobeClassifier {
    /// Creates a classifier running the `ffprobe` binary at `ffprobe_path`
    #[must_use]
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl AspectClassifier for FfprobeClassifier {
    #[instrument(skip_all, fields(path = %path.display()))]
    async fn classify(&self, path: &Path) -> MediaProcessingResult<AspectClass> {
        let result = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MediaProcessingError::Probe {
                reason: format!("failed to run {}: {e}", self.ffprobe_path),
                output: String::new(),
            })?;

        let mut captured = String::from_utf8_lossy(&result.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&result.stderr));

        if !result.status.success() {
            return Err(MediaProcessingError::Probe {
                reason: format!("ffprobe exited with {}", result.status),
                output: captured,
            });
        }

        let (width, height) =
            parse_dimensions(&result.stdout).map_err(|reason| MediaProcessingError::Probe {
                reason,
                output: captured,
            })?;

        let aspect = AspectClass::from_dimensions(width, height);
        tracing::debug!(width, height, %aspect, "video classified");

        Ok(aspect)
    }
}

/// Extracts `width` and `height` of the first stream from `ffprobe -print_format json`
fn parse_dimensions(json: &[u8]) -> Result<(f64, f64), String> {
    #[derive(Debug, Deserialize)]
    struct FfprobeOutput {
        streams: Vec<serde_json::Value>,
    }

    let parsed: FfprobeOutput = serde_json::from_slice(json)
        .map_err(|e| format!("could not parse ffprobe output: {e}"))?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| "no streams in ffprobe output".to_string())?;

    let dimension = |name: &str| {
        stream
            .get(name)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| format!("first stream has no numeric {name}"))
    };

    Ok((dimension("width")?, dimension("height")?))
}
