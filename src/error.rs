//! Error types for voxshift.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for voxshift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A chunk that failed to convert, kept for the job-level failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Zero-based chunk index.
    pub index: usize,
    /// Rendered cause of the failure.
    pub reason: String,
}

impl fmt::Display for ChunkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk {}: {}", self.index + 1, self.reason)
    }
}

/// Top-level error type for voxshift.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Source video does not exist.
    #[error("source video not found: {path}")]
    SourceNotFound {
        /// Path that was given.
        path: PathBuf,
    },

    /// Download failed.
    #[error("failed to download from '{url}'")]
    DownloadFailed {
        /// URL that failed.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An external tool could not be started at all.
    #[error("failed to start '{tool}'")]
    ToolSpawn {
        /// Program that was invoked.
        tool: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Media probe failed.
    #[error("failed to probe duration of '{path}': {reason}")]
    Probe {
        /// Probed file.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Failed to extract the audio track from the source video.
    #[error("failed to extract audio from '{path}'")]
    Extract {
        /// Source video.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<Error>,
    },

    /// Splitting audio into chunks failed.
    #[error("failed to split audio into chunks: {reason}")]
    Split {
        /// Chunk that failed, if the failure is chunk specific.
        index: Option<usize>,
        /// Description of the failure.
        reason: String,
    },

    /// External tool exited with a non-zero status.
    #[error("'{tool}' exited with {status}: {stderr}")]
    ToolExecution {
        /// Program that was invoked.
        tool: String,
        /// Exit status description.
        status: String,
        /// Captured diagnostic stream.
        stderr: String,
    },

    /// Conversion tool exited cleanly but wrote no output.
    #[error("voice conversion produced no output at '{path}'")]
    OutputMissing {
        /// Expected output path.
        path: PathBuf,
    },

    /// Combining converted chunks failed.
    #[error("failed to combine converted chunks: {reason}")]
    Combine {
        /// Description of the failure.
        reason: String,
    },

    /// Replacing the audio track failed.
    #[error("failed to remux '{video}': {reason}")]
    Remux {
        /// Source video.
        video: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// One or more chunks failed; no video was produced.
    #[error(
        "{} of {total} chunk(s) failed to convert: {}",
        failures.len(),
        failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    IncompleteConversion {
        /// Total number of chunks in the job.
        total: usize,
        /// Failed chunks in index order.
        failures: Vec<ChunkFailure>,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
