//! Replacing a video's audio track.

use super::tool::ToolCommand;
use crate::config::ToolPaths;
use crate::constants::audio_format;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Build the ffmpeg invocation that copies video from `video` and audio from `audio`.
///
/// Output length follows the shorter of the two streams (`-shortest`).
pub fn remux_command(tools: &ToolPaths, video: &Path, audio: &Path, out: &Path) -> ToolCommand {
    ToolCommand::new(&tools.ffmpeg)
        .arg("-i")
        .arg(video)
        .arg("-i")
        .arg(audio)
        .args(["-c:v", "copy", "-c:a", audio_format::REMUX_AUDIO_CODEC])
        .args(["-map", "0:v:0", "-map", "1:a:0", "-shortest"])
        .arg(out)
        .arg("-y")
}

/// Write `out` with the video stream of `video` and the audio of `audio`.
pub fn remux(tools: &ToolPaths, video: &Path, audio: &Path, out: &Path) -> Result<PathBuf> {
    for input in [video, audio] {
        if !input.is_file() {
            return Err(Error::Remux {
                video: video.to_path_buf(),
                reason: format!("missing input {}", input.display()),
            });
        }
    }

    remux_command(tools, video, audio, out)
        .run()
        .map_err(|e| Error::Remux {
            video: video.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !out.is_file() {
        return Err(Error::Remux {
            video: video.to_path_buf(),
            reason: format!("no output written to {}", out.display()),
        });
    }

    Ok(out.to_path_buf())
}
