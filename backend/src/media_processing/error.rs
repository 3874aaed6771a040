//! Error types for media processing

use thiserror::Error;

/// Result type for media processing operations
pub type MediaProcessingResult<T> = Result<T, MediaProcessingError>;

/// Errors that can occur while probing or remuxing a video
#[derive(Error, Debug)]
pub enum MediaProcessingError {
    /// The prober could not run or its output could not be classified
    #[error("Probe failed: {reason}")]
    Probe {
        /// What went wrong
        reason: String,
        /// Captured stdout and stderr of the prober
        output: String,
    },

    /// The remuxer could not run or exited unsuccessfully
    #[error("Remux failed: {reason}")]
    Remux {
        /// What went wrong
        reason: String,
        /// Captured stderr of the remuxer
        output: String,
    },
}

impl MediaProcessingError {
    /// Diagnostic output captured from the tool, for logs only
    #[must_use]
    pub fn tool_output(&self) -> &str {
        match self {
            Self::Probe { output, .. } | Self::Remux { output, .. } => output,
        }
    }
}
