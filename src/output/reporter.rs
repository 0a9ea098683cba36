//! Progress reporting for conversion jobs.
//!
//! The pipeline only talks to [`ProgressReporter`]; what the user sees is
//! decided by the implementation handed in by the caller.

use super::progress;
use indicatif::ProgressBar;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;
use tracing::info;

/// Job stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching or copying the source video.
    Download,
    /// Pulling the audio track out of the video.
    Extract,
    /// Cutting the audio into chunks.
    Split,
    /// Running voice conversion on every chunk.
    Convert,
    /// Joining converted chunks.
    Combine,
    /// Writing the final video.
    Remux,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Download => "Downloading video",
            Self::Extract => "Extracting audio",
            Self::Split => "Creating audio chunks",
            Self::Convert => "Processing audio chunks",
            Self::Combine => "Combining processed audio",
            Self::Remux => "Creating final video",
        };
        f.write_str(name)
    }
}

/// Summary of a finished job.
#[derive(Debug, Clone)]
pub struct JobSummary {
    /// Number of chunks converted.
    pub chunks: usize,
    /// Duration of the source audio in seconds.
    pub audio_secs: f64,
    /// Wall-clock time spent on the job in seconds.
    pub elapsed_secs: f64,
    /// Where the final video was written.
    pub output: PathBuf,
}

impl JobSummary {
    /// Seconds of audio processed per wall-clock second.
    pub fn realtime_factor(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.audio_secs / self.elapsed_secs
        } else {
            0.0
        }
    }
}

/// Receives progress events from a running job.
pub trait ProgressReporter: Send + Sync {
    /// A stage has started.
    fn stage_started(&self, stage: Stage);

    /// Bytes of the source video received so far.
    fn download_progress(&self, downloaded: u64, total: Option<u64>);

    /// The audio was split into `total` chunks.
    fn chunks_planned(&self, total: usize);

    /// A chunk finished converting. `error` is set when it failed.
    fn chunk_finished(&self, index: usize, error: Option<&str>);

    /// The job produced its final video.
    fn job_completed(&self, summary: &JobSummary);
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn stage_started(&self, _stage: Stage) {}
    fn download_progress(&self, _downloaded: u64, _total: Option<u64>) {}
    fn chunks_planned(&self, _total: usize) {}
    fn chunk_finished(&self, _index: usize, _error: Option<&str>) {}
    fn job_completed(&self, _summary: &JobSummary) {}
}

/// Throttles percentage updates to a minimum step.
pub struct ProgressThrottler {
    last_percent: AtomicU8,
    min_percent_change: u8,
}

impl ProgressThrottler {
    /// Create a throttler that emits every `min_percent_change` percent.
    pub fn new(min_percent_change: u8) -> Self {
        Self {
            last_percent: AtomicU8::new(0),
            min_percent_change,
        }
    }

    /// Check if an update should be emitted.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn should_emit(&self, current_percent: f64) -> bool {
        let current = current_percent.floor().clamp(0.0, 100.0) as u8;
        let last = self.last_percent.load(Ordering::Relaxed);

        // Always emit at 0% and 100%
        if current == 0 || current >= 100 || current.saturating_sub(last) >= self.min_percent_change
        {
            self.last_percent.store(current, Ordering::Relaxed);
            return true;
        }
        false
    }
}

impl Default for ProgressThrottler {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Human-readable reporter with indicatif bars.
///
/// With bars disabled it still logs stage and chunk events through tracing.
pub struct ConsoleReporter {
    bars_enabled: bool,
    download_bar: Mutex<Option<ProgressBar>>,
    chunk_bar: Mutex<Option<ProgressBar>>,
    throttler: ProgressThrottler,
    started: Instant,
}

impl ConsoleReporter {
    /// Create a console reporter.
    pub fn new(bars_enabled: bool) -> Self {
        Self {
            bars_enabled,
            download_bar: Mutex::new(None),
            chunk_bar: Mutex::new(None),
            throttler: ProgressThrottler::default(),
            started: Instant::now(),
        }
    }

    fn finish_download_bar(&self) {
        if let Ok(mut bar) = self.download_bar.lock() {
            progress::finish_progress(bar.take(), "Download complete");
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn stage_started(&self, stage: Stage) {
        if stage != Stage::Download {
            self.finish_download_bar();
        }
        if stage == Stage::Combine
            && let Ok(mut bar) = self.chunk_bar.lock()
        {
            progress::finish_progress(bar.take(), "Done");
        }
        info!("{stage}...");
    }

    #[allow(clippy::cast_precision_loss)]
    fn download_progress(&self, downloaded: u64, total: Option<u64>) {
        if self.bars_enabled {
            if let Ok(mut bar) = self.download_bar.lock() {
                let pb = bar.get_or_insert_with(|| {
                    progress::create_download_progress(total, true)
                        .unwrap_or_else(ProgressBar::hidden)
                });
                pb.set_position(downloaded);
            }
            return;
        }

        if let Some(total) = total.filter(|t| *t > 0) {
            let percent = downloaded as f64 / total as f64 * 100.0;
            if self.throttler.should_emit(percent) {
                info!(
                    "Downloaded: {:.1} MB ({percent:.0}%)",
                    downloaded as f64 / 1024.0 / 1024.0
                );
            }
        }
    }

    fn chunks_planned(&self, total: usize) {
        info!("Created {total} audio chunk(s)");
        if let Ok(mut bar) = self.chunk_bar.lock() {
            *bar = progress::create_chunk_progress(total, self.bars_enabled);
        }
    }

    fn chunk_finished(&self, index: usize, error: Option<&str>) {
        if let Ok(bar) = self.chunk_bar.lock() {
            if let (Some(pb), Some(_)) = (bar.as_ref(), error) {
                pb.set_message(format!("(chunk {} failed)", index + 1));
            }
            progress::inc_progress(bar.as_ref());
        }
    }

    fn job_completed(&self, summary: &JobSummary) {
        self.finish_download_bar();
        if let Ok(mut bar) = self.chunk_bar.lock() {
            progress::finish_progress(bar.take(), "Done");
        }
        info!(
            "Converted {} of audio in {} chunk(s) in {:.1}s ({:.2}x realtime, {:.1}s since start)",
            progress::format_duration(summary.audio_secs),
            summary.chunks,
            summary.elapsed_secs,
            summary.realtime_factor(),
            self.started.elapsed().as_secs_f64()
        );
        info!("Video written to {}", summary.output.display());
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_throttler_emits_at_boundaries() {
        let throttler = ProgressThrottler::default();
        assert!(throttler.should_emit(0.0));
        assert!(!throttler.should_emit(5.0));
        assert!(throttler.should_emit(10.0));
        assert!(!throttler.should_emit(15.0));
        assert!(throttler.should_emit(100.0));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Convert.to_string(), "Processing audio chunks");
        assert_eq!(Stage::Remux.to_string(), "Creating final video");
    }

    #[test]
    fn test_realtime_factor() {
        let summary = JobSummary {
            chunks: 3,
            audio_secs: 650.0,
            elapsed_secs: 130.0,
            output: PathBuf::from("out.mp4"),
        };
        assert_eq!(summary.realtime_factor(), 5.0);

        let instant = JobSummary {
            elapsed_secs: 0.0,
            ..summary
        };
        assert_eq!(instant.realtime_factor(), 0.0);
    }

    #[test]
    fn test_console_reporter_without_bars_accepts_events() {
        let reporter = ConsoleReporter::new(false);
        reporter.stage_started(Stage::Download);
        reporter.download_progress(512, Some(1024));
        reporter.download_progress(1024, None);
        reporter.chunks_planned(2);
        reporter.chunk_finished(0, None);
        reporter.chunk_finished(1, Some("boom"));
    }
}
