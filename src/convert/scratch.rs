//! Scoped scratch files for a single conversion call.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Input/output scratch paths owned by one conversion call.
///
/// Both files are removed when the guard is dropped, whichever way the call
/// ends. Names carry a fresh v4 UUID so concurrent calls never share a path.
#[derive(Debug)]
pub struct ScratchPair {
    input: PathBuf,
    output: PathBuf,
}

impl ScratchPair {
    /// Reserve a new uniquely named pair under `dir`.
    pub fn new(dir: &Path) -> Self {
        let id = Uuid::new_v4().simple();
        Self {
            input: dir.join(format!("input_{id}.wav")),
            output: dir.join(format!("voice_{id}.wav")),
        }
    }

    /// Scratch input path.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Scratch output path.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Drop for ScratchPair {
    fn drop(&mut self) {
        for path in [&self.input, &self.output] {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove scratch file {}: {e}", path.display()),
            }
        }
    }
}
