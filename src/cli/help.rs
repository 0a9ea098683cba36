//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print a short usage reminder with the configured defaults.
pub fn print_usage_hint(config: &Config) {
    println!("Usage: voxshift <SOURCE> [OPTIONS]");
    println!();
    println!("SOURCE is an http(s) URL or a local video file.");
    println!();
    println!("Example: voxshift https://example.com/talk.mp4 --voice female -o talk_converted.mp4");
    println!();
    println!(
        "Defaults: {} voice, {}s chunks, {} worker(s)",
        config.pipeline.voice, config.pipeline.chunk_secs, config.pipeline.workers
    );
    println!();
    println!("Run 'voxshift -h' for all options or 'voxshift config init' to create a config file.");
}
