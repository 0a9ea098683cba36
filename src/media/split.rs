//! Fixed-duration chunking of an audio file.

use super::probe;
use super::tool::{ToolCommand, format_seconds};
use crate::config::ToolPaths;
use crate::constants::{DURATION_EPSILON, audio_format};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Time range of one planned chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkSpan {
    /// Zero-based position in the source.
    pub index: usize,
    /// Start offset in seconds.
    pub start_secs: f64,
    /// Length in seconds.
    pub duration_secs: f64,
}

impl ChunkSpan {
    /// End offset in seconds.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// A chunk of audio written to its own file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// Zero-based position in the source; defines temporal order.
    pub index: usize,
    /// File holding this chunk's audio.
    pub path: PathBuf,
    /// Start offset in seconds.
    pub start_secs: f64,
    /// Length in seconds.
    pub duration_secs: f64,
}

/// Plan fixed-duration chunks covering `[0, total_secs)`.
///
/// Produces `ceil(total / chunk)` spans with no gaps or overlaps. The last
/// span may be shorter than `chunk_secs`. An exact multiple yields exactly
/// `total / chunk` spans.
///
/// # Errors
///
/// Returns [`Error::Split`] if either duration is not finite, `chunk_secs` is
/// not positive, or `total_secs` is negative.
pub fn plan_chunks(total_secs: f64, chunk_secs: f64) -> Result<Vec<ChunkSpan>> {
    if !chunk_secs.is_finite() || chunk_secs <= 0.0 {
        return Err(Error::Split {
            index: None,
            reason: format!("chunk duration must be positive, got {chunk_secs}"),
        });
    }
    if !total_secs.is_finite() || total_secs < 0.0 {
        return Err(Error::Split {
            index: None,
            reason: format!("audio duration must be non-negative, got {total_secs}"),
        });
    }
    if total_secs <= DURATION_EPSILON {
        return Ok(Vec::new());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = ((total_secs - DURATION_EPSILON) / chunk_secs).ceil() as usize;

    let spans = (0..count)
        .map(|index| {
            #[allow(clippy::cast_precision_loss)]
            let start_secs = index as f64 * chunk_secs;
            ChunkSpan {
                index,
                start_secs,
                duration_secs: chunk_secs.min(total_secs - start_secs),
            }
        })
        .collect();

    Ok(spans)
}

/// File name for a chunk inside the chunk directory.
pub fn chunk_file_name(index: usize) -> String {
    format!("chunk_{index:03}.wav")
}

/// Build the ffmpeg invocation that extracts one denoised chunk.
pub fn chunk_command(tools: &ToolPaths, audio: &Path, span: &ChunkSpan, out: &Path) -> ToolCommand {
    ToolCommand::new(&tools.ffmpeg)
        .arg("-i")
        .arg(audio)
        .arg("-ss")
        .arg(format_seconds(span.start_secs))
        .arg("-t")
        .arg(format_seconds(span.duration_secs))
        .args(["-af", audio_format::DENOISE_FILTER])
        .arg("-ar")
        .arg(audio_format::SAMPLE_RATE.to_string())
        .arg("-ac")
        .arg(audio_format::CHANNELS.to_string())
        .args(["-c:a", audio_format::PCM_CODEC])
        .arg(out)
        .arg("-y")
}

/// Split an audio file into fixed-duration chunk files under `out_dir`.
///
/// Any failed extraction aborts the whole split.
pub fn split_audio(
    tools: &ToolPaths,
    audio: &Path,
    chunk_secs: f64,
    out_dir: &Path,
) -> Result<Vec<AudioChunk>> {
    let total_secs = probe::duration(tools, audio)?;
    let spans = plan_chunks(total_secs, chunk_secs)?;
    info!(
        "Splitting {:.1}s of audio into {} chunk(s) of up to {:.0}s",
        total_secs,
        spans.len(),
        chunk_secs
    );

    std::fs::create_dir_all(out_dir).map_err(|e| Error::Split {
        index: None,
        reason: format!("cannot create {}: {e}", out_dir.display()),
    })?;

    let mut chunks = Vec::with_capacity(spans.len());
    for span in &spans {
        let path = out_dir.join(chunk_file_name(span.index));
        chunk_command(tools, audio, span, &path)
            .run()
            .map_err(|e| Error::Split {
                index: Some(span.index),
                reason: format!("chunk {}: {e}", span.index + 1),
            })?;

        if !path.is_file() {
            return Err(Error::Split {
                index: Some(span.index),
                reason: format!("chunk {} was not written", span.index + 1),
            });
        }

        debug!(
            "Chunk {}: {:.1}s-{:.1}s -> {}",
            span.index + 1,
            span.start_secs,
            span.end_secs(),
            path.display()
        );

        chunks.push(AudioChunk {
            index: span.index,
            path,
            start_secs: span.start_secs,
            duration_secs: span.duration_secs,
        });
    }

    Ok(chunks)
}
