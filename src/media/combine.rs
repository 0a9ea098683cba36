//! Ordered joining of converted chunks.

use super::tool::ToolCommand;
use crate::config::ToolPaths;
use crate::constants::scratch;
use crate::error::{Error, Result};
use hound::{SampleFormat, WavReader};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Format fields that must agree across all joined chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Integer or float samples.
    pub sample_format: SampleFormat,
}

/// Read the format of a WAV file without decoding its samples.
pub fn read_wav_format(path: &Path) -> Result<WavFormat> {
    if !path.is_file() {
        return Err(Error::Combine {
            reason: format!("missing chunk {}", path.display()),
        });
    }

    let reader = WavReader::open(path).map_err(|e| Error::Combine {
        reason: format!("unreadable chunk {}: {e}", path.display()),
    })?;
    let spec = reader.spec();

    Ok(WavFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        sample_format: spec.sample_format,
    })
}

/// Check that every chunk exists, is a readable WAV, and shares one format.
pub fn check_formats(chunks: &[PathBuf]) -> Result<WavFormat> {
    let (first, rest) = chunks.split_first().ok_or_else(|| Error::Combine {
        reason: "no chunks to combine".to_string(),
    })?;

    let expected = read_wav_format(first)?;
    for path in rest {
        let format = read_wav_format(path)?;
        if format != expected {
            return Err(Error::Combine {
                reason: format!(
                    "format mismatch in {}: expected {expected:?}, found {format:?}",
                    path.display()
                ),
            });
        }
    }

    Ok(expected)
}

/// Render the concat demuxer list for `chunks`.
pub fn concat_list(chunks: &[PathBuf]) -> String {
    chunks.iter().fold(String::new(), |mut list, path| {
        // Single quotes inside a quoted entry are written as '\''
        let escaped = path.to_string_lossy().replace('\'', r"'\''");
        let _ = writeln!(list, "file '{escaped}'");
        list
    })
}

/// Build the ffmpeg invocation that copies a single chunk through.
pub fn copy_command(tools: &ToolPaths, chunk: &Path, out: &Path) -> ToolCommand {
    ToolCommand::new(&tools.ffmpeg)
        .arg("-i")
        .arg(chunk)
        .args(["-c", "copy"])
        .arg(out)
        .arg("-y")
}

/// Build the ffmpeg invocation that joins the chunks named in `list`.
pub fn concat_command(tools: &ToolPaths, list: &Path, out: &Path) -> ToolCommand {
    ToolCommand::new(&tools.ffmpeg)
        .args(["-f", "concat", "-safe", "0", "-i"])
        .arg(list)
        .args(["-c", "copy"])
        .arg(out)
        .arg("-y")
}

/// Join index-ordered chunk files into `out`.
///
/// A single chunk is copied through. Multiple chunks are joined at stream
/// level without re-encoding, so they must share one WAV format.
pub fn combine_chunks(tools: &ToolPaths, ordered: &[PathBuf], out: &Path) -> Result<PathBuf> {
    let format = check_formats(ordered)?;
    debug!(
        "Combining {} chunk(s) at {} Hz, {} ch, {} bit",
        ordered.len(),
        format.sample_rate,
        format.channels,
        format.bits_per_sample
    );

    let command = if let [single] = ordered {
        copy_command(tools, single, out)
    } else {
        let list_path = out.with_file_name(scratch::CONCAT_LIST);
        std::fs::write(&list_path, concat_list(ordered)).map_err(|e| Error::Combine {
            reason: format!("cannot write {}: {e}", list_path.display()),
        })?;
        concat_command(tools, &list_path, out)
    };

    command.run().map_err(|e| Error::Combine {
        reason: e.to_string(),
    })?;

    if !out.is_file() {
        return Err(Error::Combine {
            reason: format!("no output written to {}", out.display()),
        });
    }

    Ok(out.to_path_buf())
}
