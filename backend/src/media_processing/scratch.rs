use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Per-request scratch files, removed when the space is dropped.
///
/// Paths are registered before the file behind them is created, so an early return, a
/// failed tool run or a dropped request future never leaves them behind.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
    artifacts: Vec<PathBuf>,
}

impl ScratchSpace {
    /// Creates an empty scratch space below `dir`
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            artifacts: Vec::new(),
        }
    }

    /// Reserves a fresh `{uuid}.{extension}` path in the scratch directory
    pub fn reserve(&mut self, extension: &str) -> PathBuf {
        self.track(self.dir.join(format!("{}.{extension}", Uuid::new_v4())))
    }

    /// Registers `path` for removal and hands it back
    pub fn track(&mut self, path: PathBuf) -> PathBuf {
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path.clone());
        }
        path
    }

    /// Registered paths, in registration order
    #[must_use]
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }
}

fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::trace!(path = %path.display(), "scratch file removed"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "failed to remove scratch file: {e}"),
    }
}

impl Drop for ScratchSpace {
    // Blocking removal on the request task: a space holds at most two files, and they
    // must be gone before the response is written.
    fn drop(&mut self) {
        for path in self.artifacts.iter().rev() {
            remove_artifact(path);
        }
    }
}
