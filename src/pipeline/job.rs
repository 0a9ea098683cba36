//! End-to-end conversion of one video.

use super::coordinator::{ConversionResults, Coordinator};
use super::workspace::JobWorkspace;
use crate::config::{Config, ToolPaths, Voice};
use crate::convert::{RvcConverter, VoiceConverter};
use crate::download::{download_video, is_remote_source};
use crate::error::{Error, Result};
use crate::media::{self, AudioChunk};
use crate::output::{JobSummary, ProgressReporter, Stage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Per-job settings resolved from CLI, environment and config.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Target voice.
    pub voice: Voice,
    /// Chunk duration in seconds.
    pub chunk_secs: f64,
    /// Number of conversion workers.
    pub workers: usize,
    /// Where the final video is written.
    pub output: PathBuf,
    /// Leave the scratch workspace on disk.
    pub keep_scratch: bool,
}

/// Result of converting the audio of a video already in a workspace.
#[derive(Debug, Clone)]
pub struct ConvertedVideo {
    /// Remuxed video inside the workspace.
    pub video: PathBuf,
    /// Number of chunks converted.
    pub chunks: usize,
    /// Total audio duration in seconds.
    pub audio_secs: f64,
}

/// Convert `source` (URL or local path) and write the result to
/// `options.output`.
pub fn run_job(
    config: &Config,
    source: &str,
    options: &JobOptions,
    reporter: &dyn ProgressReporter,
) -> Result<JobSummary> {
    let started = Instant::now();
    let workspace = JobWorkspace::create()?;
    debug!("Job workspace: {}", workspace.path().display());

    let result = run_in_workspace(config, source, options, reporter, &workspace);

    if options.keep_scratch {
        workspace.keep();
    }

    let converted = result?;
    deliver(&converted.video, &options.output)?;

    let summary = JobSummary {
        chunks: converted.chunks,
        audio_secs: converted.audio_secs,
        elapsed_secs: started.elapsed().as_secs_f64(),
        output: options.output.clone(),
    };
    reporter.job_completed(&summary);
    Ok(summary)
}

fn run_in_workspace(
    config: &Config,
    source: &str,
    options: &JobOptions,
    reporter: &dyn ProgressReporter,
    workspace: &JobWorkspace,
) -> Result<ConvertedVideo> {
    reporter.stage_started(Stage::Download);
    fetch_source(source, &workspace.source_video(), reporter)?;

    let converter = RvcConverter::new(
        config.converter.clone(),
        config.voices.clone(),
        workspace.convert_dir(),
    );
    convert_video(&config.tools, &converter, workspace, options, reporter)
}

/// Put the source video at `dest`, downloading it if `source` is a URL.
pub fn fetch_source(source: &str, dest: &Path, reporter: &dyn ProgressReporter) -> Result<()> {
    if is_remote_source(source) {
        let bytes = download_video(source, dest, reporter)?;
        info!("Downloaded {bytes} bytes from {source}");
        return Ok(());
    }

    let path = Path::new(source);
    if !path.is_file() {
        return Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::copy(path, dest)?;
    debug!("Copied {} into workspace", path.display());
    Ok(())
}

/// Run extract, split, convert, combine and remux on the workspace's source
/// video.
pub fn convert_video(
    tools: &ToolPaths,
    converter: &dyn VoiceConverter,
    workspace: &JobWorkspace,
    options: &JobOptions,
    reporter: &dyn ProgressReporter,
) -> Result<ConvertedVideo> {
    let video = workspace.source_video();
    let audio = workspace.extracted_audio();

    reporter.stage_started(Stage::Extract);
    media::extract_audio(tools, &video, &audio)?;

    reporter.stage_started(Stage::Split);
    let chunks = media::split_audio(tools, &audio, options.chunk_secs, &workspace.chunk_dir())?;
    if chunks.is_empty() {
        return Err(Error::Split {
            index: None,
            reason: format!("{} contains no audio", video.display()),
        });
    }
    log_chunks(&chunks);
    let total = chunks.len();
    let audio_secs = chunks.iter().map(|c| c.duration_secs).sum();
    reporter.chunks_planned(total);

    reporter.stage_started(Stage::Convert);
    let coordinator = Coordinator::new(
        converter,
        reporter,
        options.workers,
        workspace.processed_dir(),
    );
    let results = coordinator.run(chunks, options.voice)?;

    let video = finish_video(tools, results, workspace, &options.output, reporter)?;
    Ok(ConvertedVideo {
        video,
        chunks: total,
        audio_secs,
    })
}

/// Combine converted chunks and remux them into the source video.
///
/// Nothing is combined unless every chunk converted. The remuxed file uses
/// the container implied by `output`'s extension, so delivering it is a
/// plain copy.
pub fn finish_video(
    tools: &ToolPaths,
    results: ConversionResults,
    workspace: &JobWorkspace,
    output: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<PathBuf> {
    let ordered = results.into_ordered_artifacts()?;

    reporter.stage_started(Stage::Combine);
    let combined = media::combine_chunks(tools, &ordered, &workspace.combined_audio())?;

    reporter.stage_started(Stage::Remux);
    media::remux(
        tools,
        &workspace.source_video(),
        &combined,
        &workspace.final_video_for(output),
    )
}

fn log_chunks(chunks: &[AudioChunk]) {
    for chunk in chunks {
        #[allow(clippy::cast_precision_loss)]
        let size_mb = fs::metadata(&chunk.path)
            .map(|m| m.len() as f64 / 1024.0 / 1024.0)
            .unwrap_or(0.0);
        debug!(
            "Chunk {}: {:.2}s, {size_mb:.2} MB",
            chunk.index + 1,
            chunk.duration_secs
        );
    }
}

fn deliver(video: &Path, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::copy(video, output)?;
    info!("Final video written to {}", output.display());
    Ok(())
}
