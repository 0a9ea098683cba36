//! CLI argument definitions.

use super::validators::{parse_chunk_secs, parse_workers};
use crate::config::Voice;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Convert the spoken accent of a video's audio track.
#[derive(Debug, Parser)]
#[command(name = "voxshift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Source video: an http(s) URL or a local file.
    pub source: Option<String>,

    /// Options for the conversion job.
    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List the voice models in the current configuration.
    Voices,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for a conversion job.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConvertArgs {
    /// Target voice (default from config).
    #[arg(long, value_enum, env = "VOXSHIFT_VOICE")]
    pub voice: Option<Voice>,

    /// Output video path [default: accent_converted_video.mp4].
    #[arg(short, long, env = "VOXSHIFT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Chunk duration in seconds.
    #[arg(long, value_parser = parse_chunk_secs, env = "VOXSHIFT_CHUNK_SECS")]
    pub chunk_secs: Option<f64>,

    /// Number of concurrent conversion workers.
    #[arg(short, long, value_parser = parse_workers, env = "VOXSHIFT_WORKERS")]
    pub workers: Option<usize>,

    /// Keep the scratch directory after the job ends.
    #[arg(long)]
    pub keep_scratch: bool,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,

    /// Only print warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
