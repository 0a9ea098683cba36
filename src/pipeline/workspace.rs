//! Per-job scratch workspace.

use crate::constants::scratch;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Scratch directory holding every intermediate artifact of one job.
///
/// Removed on drop unless [`JobWorkspace::keep`] was called. Live workspaces
/// are also tracked so an interrupt can remove them.
pub struct JobWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl JobWorkspace {
    /// Create a fresh workspace under the system temp directory.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(scratch::JOB_DIR_PREFIX)
            .tempdir()?;
        Self::from_temp_dir(dir)
    }

    /// Create a fresh workspace under `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(scratch::JOB_DIR_PREFIX)
            .tempdir_in(parent)?;
        Self::from_temp_dir(dir)
    }

    fn from_temp_dir(dir: TempDir) -> Result<Self> {
        let path = dir.path().to_path_buf();
        for sub in [
            scratch::CHUNK_DIR,
            scratch::PROCESSED_DIR,
            scratch::CONVERT_DIR,
        ] {
            fs::create_dir_all(path.join(sub))?;
        }
        register_workspace(&path);
        debug!("Created job workspace {}", path.display());
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source video location.
    pub fn source_video(&self) -> PathBuf {
        self.path.join(scratch::SOURCE_VIDEO)
    }

    /// Extracted audio location.
    pub fn extracted_audio(&self) -> PathBuf {
        self.path.join(scratch::EXTRACTED_AUDIO)
    }

    /// Directory for split chunks.
    pub fn chunk_dir(&self) -> PathBuf {
        self.path.join(scratch::CHUNK_DIR)
    }

    /// Directory for converted chunks.
    pub fn processed_dir(&self) -> PathBuf {
        self.path.join(scratch::PROCESSED_DIR)
    }

    /// Directory for dispatcher scratch files.
    pub fn convert_dir(&self) -> PathBuf {
        self.path.join(scratch::CONVERT_DIR)
    }

    /// Combined audio location.
    pub fn combined_audio(&self) -> PathBuf {
        self.path.join(scratch::COMBINED_AUDIO)
    }

    /// Remuxed video location, in the container named by `output`'s
    /// extension. Falls back to MP4 when `output` has none.
    pub fn final_video_for(&self, output: &Path) -> PathBuf {
        let default = self.path.join(scratch::FINAL_VIDEO);
        match output.extension() {
            Some(ext) if !ext.is_empty() => default.with_extension(ext),
            _ => default,
        }
    }

    /// Leave the workspace on disk after the job ends.
    pub fn keep(mut self) -> PathBuf {
        if let Some(dir) = self.dir.take() {
            let kept = dir.keep();
            info!("Keeping scratch workspace {}", kept.display());
        }
        unregister_workspace(&self.path);
        self.path.clone()
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                warn!("Failed to remove workspace {}: {e}", self.path.display());
            }
            unregister_workspace(&self.path);
        }
    }
}

/// Global registry of live workspaces for cleanup on signal.
static ACTIVE_WORKSPACES: std::sync::LazyLock<std::sync::Mutex<Vec<PathBuf>>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(Vec::new()));

fn register_workspace(path: &Path) {
    if let Ok(mut dirs) = ACTIVE_WORKSPACES.lock() {
        dirs.push(path.to_path_buf());
    }
}

fn unregister_workspace(path: &Path) {
    if let Ok(mut dirs) = ACTIVE_WORKSPACES.lock() {
        dirs.retain(|p| p != path);
    }
}

/// Remove every live workspace. Called on signal.
pub fn cleanup_all_workspaces() {
    if let Ok(dirs) = ACTIVE_WORKSPACES.lock() {
        remove_dirs(&dirs);
    }
}

fn remove_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        let _ = fs::remove_dir_all(dir);
    }
}
