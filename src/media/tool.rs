//! External tool invocation.
//!
//! Every call into ffmpeg, ffprobe or the conversion process goes through
//! [`ToolCommand`], which captures both output streams and maps spawn failures
//! and non-zero exits onto [`Error`].

use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured output of a successful tool run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// A fully specified tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Start a command for `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run the command from `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: Option<&Path>) -> Self {
        self.current_dir = dir.map(Path::to_path_buf);
        self
    }

    /// Program this command will execute.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments in order.
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Short tool name for messages.
    pub fn tool_name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.to_string_lossy().into_owned(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    /// Run to completion.
    ///
    /// Returns [`Error::ToolSpawn`] if the program cannot be started and
    /// [`Error::ToolExecution`] (carrying stderr) if it exits non-zero.
    pub fn run(&self) -> Result<ToolOutput> {
        debug!(
            "Running {} {}",
            self.program.display(),
            self.args
                .iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| Error::ToolSpawn {
            tool: self.tool_name(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::ToolExecution {
                tool: self.tool_name(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

/// Format seconds the way ffmpeg expects for `-ss` / `-t`.
pub fn format_seconds(secs: f64) -> String {
    let formatted = format!("{secs:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "0");
        assert_eq!(format_seconds(300.0), "300");
        assert_eq!(format_seconds(50.25), "50.25");
        assert_eq!(format_seconds(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_builder_collects_arguments_in_order() {
        let cmd = ToolCommand::new("ffmpeg").arg("-i").args(["a.wav", "-y"]);
        let args: Vec<_> = cmd.arguments().iter().map(|a| a.to_string_lossy()).collect();
        assert_eq!(args, ["-i", "a.wav", "-y"]);
        assert_eq!(cmd.tool_name(), "ffmpeg");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let result = ToolCommand::new("/nonexistent/voxshift-tool").run();
        assert!(matches!(result, Err(Error::ToolSpawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_carries_stderr() {
        let result = ToolCommand::new("sh")
            .args(["-c", "echo broken pipe >&2; exit 3"])
            .run();
        match result {
            Err(Error::ToolExecution { tool, stderr, .. }) => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "broken pipe");
            }
            other => panic!("expected ToolExecution, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_success_captures_stdout() {
        let output = ToolCommand::new("sh").args(["-c", "echo 12.5"]).run().unwrap();
        assert_eq!(output.stdout.trim(), "12.5");
    }
}
