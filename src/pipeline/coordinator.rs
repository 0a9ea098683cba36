//! Parallel chunk conversion.
//!
//! Chunks are queued in index order and drained by a fixed pool of worker
//! threads. Workers report `(index, outcome)` over a channel; the calling
//! thread is the only writer of the result slots, so no slot is shared
//! between writers. Completion order is whatever the workers produce.

use crate::config::Voice;
use crate::convert::VoiceConverter;
use crate::error::{ChunkFailure, Error, Result};
use crate::media::AudioChunk;
use crate::output::ProgressReporter;
use crossbeam::channel;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

/// One chunk handed to a worker.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Chunk to convert.
    pub chunk: AudioChunk,
    /// Target voice.
    pub voice: Voice,
}

/// What happened to one chunk.
#[derive(Debug)]
pub enum ChunkOutcome {
    /// Converted audio was written to this file.
    Success(PathBuf),
    /// Conversion failed.
    Failure(Error),
}

/// Outcome of one chunk, keyed by its index.
#[derive(Debug)]
pub struct ConversionResult {
    /// Chunk index.
    pub index: usize,
    /// Success or failure.
    pub outcome: ChunkOutcome,
}

impl ConversionResult {
    /// Whether this chunk converted.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Success(_))
    }
}

/// Complete set of results for a job, one per chunk, in index order.
#[derive(Debug, Default)]
pub struct ConversionResults {
    results: Vec<ConversionResult>,
}

impl ConversionResults {
    /// Number of chunks covered.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there were no chunks.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result for chunk `index`.
    pub fn get(&self, index: usize) -> Option<&ConversionResult> {
        self.results.get(index)
    }

    /// Results in index order.
    pub fn iter(&self) -> impl Iterator<Item = &ConversionResult> {
        self.results.iter()
    }

    /// Number of chunks that converted.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Failed chunks in index order.
    pub fn failures(&self) -> Vec<ChunkFailure> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                ChunkOutcome::Failure(e) => Some(ChunkFailure {
                    index: r.index,
                    reason: e.to_string(),
                }),
                ChunkOutcome::Success(_) => None,
            })
            .collect()
    }

    /// Converted files in index order, if every chunk succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteConversion`] listing every failed chunk.
    pub fn into_ordered_artifacts(self) -> Result<Vec<PathBuf>> {
        let failures = self.failures();
        if !failures.is_empty() {
            return Err(Error::IncompleteConversion {
                total: self.results.len(),
                failures,
            });
        }

        Ok(self
            .results
            .into_iter()
            .filter_map(|r| match r.outcome {
                ChunkOutcome::Success(path) => Some(path),
                ChunkOutcome::Failure(_) => None,
            })
            .collect())
    }
}

/// File name for a converted chunk.
pub fn processed_file_name(index: usize) -> String {
    format!("processed_chunk_{index:03}.wav")
}

/// Runs chunk conversions on a bounded worker pool.
pub struct Coordinator<'a> {
    converter: &'a dyn VoiceConverter,
    reporter: &'a dyn ProgressReporter,
    workers: usize,
    output_dir: PathBuf,
}

impl<'a> Coordinator<'a> {
    /// Create a coordinator writing converted chunks into `output_dir`.
    ///
    /// `workers` is clamped to at least one.
    pub fn new(
        converter: &'a dyn VoiceConverter,
        reporter: &'a dyn ProgressReporter,
        workers: usize,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            converter,
            reporter,
            workers: workers.max(1),
            output_dir,
        }
    }

    /// Convert every chunk and block until each has exactly one outcome.
    ///
    /// A failing chunk does not stop its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if chunk indices are not exactly `0..n`.
    pub fn run(&self, mut chunks: Vec<AudioChunk>, voice: Voice) -> Result<ConversionResults> {
        chunks.sort_by_key(|c| c.index);
        if let Some((position, chunk)) = chunks.iter().enumerate().find(|(i, c)| c.index != *i) {
            return Err(Error::Internal {
                message: format!(
                    "chunk indices must be contiguous from 0, found {} at position {position}",
                    chunk.index
                ),
            });
        }

        let total = chunks.len();
        if total == 0 {
            return Ok(ConversionResults::default());
        }

        let workers = self.workers.min(total);
        info!("Converting {total} chunk(s) with {workers} worker(s) ({voice} voice)");

        let (job_tx, job_rx) = channel::unbounded::<ConversionRequest>();
        let (result_tx, result_rx) = channel::unbounded::<ConversionResult>();

        for chunk in chunks {
            // The receiver is alive until the scope below ends
            let _ = job_tx.send(ConversionRequest { chunk, voice });
        }
        drop(job_tx);

        let mut slots: Vec<Option<ConversionResult>> = (0..total).map(|_| None).collect();

        thread::scope(|scope| {
            for worker_id in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("convert-{worker_id}"))
                    .spawn_scoped(scope, move || {
                        while let Ok(request) = job_rx.recv() {
                            let index = request.chunk.index;
                            let outcome = self.guarded_process_chunk(&request);
                            if result_tx.send(ConversionResult { index, outcome }).is_err() {
                                break;
                            }
                        }
                    });
                if let Err(e) = spawned {
                    warn!("Failed to start conversion worker {worker_id}: {e}");
                }
            }
            drop(job_rx);
            drop(result_tx);

            for result in result_rx.iter() {
                self.record(&mut slots, result);
            }
        });

        let results = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| ConversionResult {
                    index,
                    outcome: ChunkOutcome::Failure(Error::Internal {
                        message: "no worker picked up this chunk".to_string(),
                    }),
                })
            })
            .collect();

        Ok(ConversionResults { results })
    }

    /// Store one worker result. Runs on the aggregating thread only.
    fn record(&self, slots: &mut [Option<ConversionResult>], result: ConversionResult) {
        let index = result.index;
        match &result.outcome {
            ChunkOutcome::Success(path) => {
                info!("Chunk {} processed successfully", index + 1);
                debug!("Chunk {} written to {}", index + 1, path.display());
                self.reporter.chunk_finished(index, None);
            }
            ChunkOutcome::Failure(e) => {
                warn!("Failed to process chunk {}: {e}", index + 1);
                self.reporter.chunk_finished(index, Some(&e.to_string()));
            }
        }

        match slots.get_mut(index) {
            Some(slot @ None) => *slot = Some(result),
            Some(Some(_)) => warn!("Ignoring duplicate result for chunk {}", index + 1),
            None => warn!("Ignoring result for unknown chunk {}", index + 1),
        }
    }

    /// Process one chunk, turning a panic into a failure of that chunk only.
    fn guarded_process_chunk(&self, request: &ConversionRequest) -> ChunkOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.process_chunk(request))) {
            Ok(Ok(path)) => ChunkOutcome::Success(path),
            Ok(Err(e)) => ChunkOutcome::Failure(e),
            Err(payload) => {
                remove_consumed_chunk(&request.chunk.path);
                let message = panic_message(payload.as_ref());
                ChunkOutcome::Failure(Error::Internal {
                    message: format!("conversion panicked: {message}"),
                })
            }
        }
    }

    /// Read, convert and write one chunk.
    fn process_chunk(&self, request: &ConversionRequest) -> Result<PathBuf> {
        let chunk = &request.chunk;
        let audio = fs::read(&chunk.path)?;

        let converted = self.converter.convert(&audio, request.voice);
        remove_consumed_chunk(&chunk.path);
        let converted = converted?;

        let out = self.output_dir.join(processed_file_name(chunk.index));
        fs::write(&out, converted)?;
        Ok(out)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn remove_consumed_chunk(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!("Could not remove consumed chunk {}: {e}", path.display());
    }
}
