//! Video processing: aspect classification, fast-start remuxing and scratch files
//!
//! The external tools sit behind two narrow capabilities so routes can be exercised
//! without `ffprobe`/`ffmpeg` installed.

mod error;
mod faststart;
mod probe;
mod scratch;
mod self_check;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use strum::Display;

pub use error::{MediaProcessingError, MediaProcessingResult};
pub use faststart::{processing_path, FfmpegFastStart};
pub use probe::FfprobeClassifier;
pub use scratch::ScratchSpace;
pub use self_check::run_self_check;

const ASPECT_TOLERANCE: f64 = 0.01;

/// Display orientation of a video, used as the object key prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AspectClass {
    /// 16:9 within tolerance
    Landscape,
    /// 9:16 within tolerance
    Portrait,
    /// Anything else, including degenerate dimensions
    Other,
}

impl AspectClass {
    /// Classifies `width / height` against 16:9 and 9:16 with an absolute tolerance of 0.01
    #[must_use]
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        let ratio = width / height;

        if (ratio - 16.0 / 9.0).abs() < ASPECT_TOLERANCE {
            Self::Landscape
        } else if (ratio - 9.0 / 16.0).abs() < ASPECT_TOLERANCE {
            Self::Portrait
        } else {
            Self::Other
        }
    }

    /// Object key prefix for this class
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Other => "other",
        }
    }
}

/// Reads the display orientation of a local video file
#[async_trait]
pub trait AspectClassifier: Send + Sync {
    /// Classifies the first stream of the file at `path`
    async fn classify(&self, path: &Path) -> MediaProcessingResult<AspectClass>;
}

/// Rewrites a video so its container metadata sits at the head of the file
#[async_trait]
pub trait FastStartTransformer: Send + Sync {
    /// Writes the fast-start copy of `input` to `output` without re-encoding
    async fn transform(&self, input: &Path, output: &Path) -> MediaProcessingResult<()>;
}

/// Per-process video pipeline shared by all upload requests
pub struct VideoProcessor {
    classifier: Arc<dyn AspectClassifier>,
    transformer: Arc<dyn FastStartTransformer>,
    scratch_dir: PathBuf,
}

impl VideoProcessor {
    /// Creates a video processor writing scratch files below `scratch_dir`
    #[must_use]
    pub fn new(
        classifier: Arc<dyn AspectClassifier>,
        transformer: Arc<dyn FastStartTransformer>,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            classifier,
            transformer,
            scratch_dir,
        }
    }

    /// Opens an empty scratch space for one request
    #[must_use]
    pub fn scratch_space(&self) -> ScratchSpace {
        ScratchSpace::new(self.scratch_dir.clone())
    }

    /// Probes the display orientation of `path`
    ///
    /// # Errors
    ///
    /// Returns `MediaProcessingError::Probe` if the file cannot be classified
    pub async fn probe(&self, path: &Path) -> MediaProcessingResult<AspectClass> {
        self.classifier.classify(path).await
    }

    /// Remuxes `input` for fast start and returns the processed path.
    ///
    /// The output path is registered with `scratch` before the remuxer runs, so a partial
    /// output is removed with the rest of the scratch space.
    ///
    /// # Errors
    ///
    /// Returns `MediaProcessingError::Remux` if the remuxer fails
    pub async fn remux(
        &self,
        scratch: &mut ScratchSpace,
        input: &Path,
    ) -> MediaProcessingResult<PathBuf> {
        let output = scratch.track(processing_path(input));
        self.transformer.transform(input, &output).await?;
        Ok(output)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::path::Path;

    use async_trait::async_trait;

    use super::{
        AspectClass, AspectClassifier, FastStartTransformer, MediaProcessingError,
        MediaProcessingResult,
    };

    /// Classifier returning a fixed class, or failing like an unreadable file
    pub struct MockAspectClassifier {
        aspect: Option<AspectClass>,
    }

    impl MockAspectClassifier {
        #[must_use]
        pub const fn returning(aspect: AspectClass) -> Self {
            Self {
                aspect: Some(aspect),
            }
        }

        #[must_use]
        pub const fn failing() -> Self {
            Self { aspect: None }
        }
    }

    #[async_trait]
    impl AspectClassifier for MockAspectClassifier {
        async fn classify(&self, path: &Path) -> MediaProcessingResult<AspectClass> {
            if !path.is_file() {
                return Err(MediaProcessingError::Probe {
                    reason: format!("{} does not exist", path.display()),
                    output: String::new(),
                });
            }

            self.aspect.ok_or_else(|| MediaProcessingError::Probe {
                reason: "no streams in probe output".to_string(),
                output: "Invalid data found when processing input".to_string(),
            })
        }
    }

    /// Transformer copying input to output, or leaving a partial output and failing
    pub struct MockFastStart {
        fail: bool,
    }

    impl MockFastStart {
        #[must_use]
        pub const fn new() -> Self {
            Self { fail: false }
        }

        #[must_use]
        pub const fn failing() -> Self {
            Self { fail: true }
        }
    }

    impl Default for MockFastStart {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl FastStartTransformer for MockFastStart {
        async fn transform(&self, input: &Path, output: &Path) -> MediaProcessingResult<()> {
            if self.fail {
                let _ = tokio::fs::write(output, b"partial").await;
                return Err(MediaProcessingError::Remux {
                    reason: "remuxer exited with status 1".to_string(),
                    output: "moov atom not found".to_string(),
                });
            }

            tokio::fs::copy(input, output)
                .await
                .map_err(|e| MediaProcessingError::Remux {
                    reason: e.to_string(),
                    output: String::new(),
                })?;
            Ok(())
        }
    }
}
