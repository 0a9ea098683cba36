//! Audio track extraction from the source video.

use super::tool::ToolCommand;
use crate::config::ToolPaths;
use crate::constants::audio_format;
use crate::error::{Error, Result};
use std::path::Path;

/// Build the ffmpeg invocation that writes the video's audio as PCM WAV.
pub fn extract_command(tools: &ToolPaths, video: &Path, out: &Path) -> ToolCommand {
    ToolCommand::new(&tools.ffmpeg)
        .arg("-i")
        .arg(video)
        .args(["-vn", "-acodec", audio_format::PCM_CODEC])
        .arg("-ar")
        .arg(audio_format::SAMPLE_RATE.to_string())
        .arg("-ac")
        .arg(audio_format::CHANNELS.to_string())
        .arg(out)
        .arg("-y")
}

/// Extract the audio track of `video` into `out`.
pub fn extract_audio(tools: &ToolPaths, video: &Path, out: &Path) -> Result<()> {
    if !video.is_file() {
        return Err(Error::SourceNotFound {
            path: video.to_path_buf(),
        });
    }

    extract_command(tools, video, out)
        .run()
        .map_err(|e| Error::Extract {
            path: video.to_path_buf(),
            source: Box::new(e),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command_arguments() {
        let cmd = extract_command(
            &ToolPaths::default(),
            Path::new("video.mp4"),
            Path::new("audio.wav"),
        );
        let args: Vec<_> = cmd.arguments().iter().map(|a| a.to_string_lossy()).collect();
        assert_eq!(
            args,
            [
                "-i",
                "video.mp4",
                "-vn",
                "-acodec",
                "pcm_s16le",
                "-ar",
                "44100",
                "-ac",
                "2",
                "audio.wav",
                "-y"
            ]
        );
    }

    #[test]
    fn test_extract_missing_video() {
        let result = extract_audio(
            &ToolPaths::default(),
            Path::new("/nonexistent/video.mp4"),
            Path::new("/tmp/audio.wav"),
        );
        assert!(matches!(result, Err(Error::SourceNotFound { .. })));
    }
}
