//! Duration queries through ffprobe.

use super::tool::ToolCommand;
use crate::config::ToolPaths;
use crate::error::{Error, Result};
use std::path::Path;

/// Build the ffprobe invocation that prints a file's duration.
pub fn probe_command(tools: &ToolPaths, path: &Path) -> ToolCommand {
    ToolCommand::new(&tools.ffprobe)
        .args([
            "-v",
            "quiet",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
}

/// Report the duration of a media file in seconds.
///
/// Fails with [`Error::Probe`] if the file is missing, ffprobe fails, or the
/// reported value is not a finite non-negative number.
pub fn duration(tools: &ToolPaths, path: &Path) -> Result<f64> {
    if !path.is_file() {
        return Err(Error::Probe {
            path: path.to_path_buf(),
            reason: "file does not exist".to_string(),
        });
    }

    let output = probe_command(tools, path)
        .run()
        .map_err(|e| Error::Probe {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    parse_duration(&output.stdout).ok_or_else(|| Error::Probe {
        path: path.to_path_buf(),
        reason: format!("unexpected ffprobe output: {:?}", output.stdout.trim()),
    })
}

/// Parse ffprobe's single-value duration output.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    let value: f64 = stdout.lines().map(str::trim).find(|l| !l.is_empty())?.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
