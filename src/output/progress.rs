//! Progress bar utilities for conversion jobs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a byte progress bar for downloading the source video.
///
/// An unknown size gives a spinner that still shows bytes received.
pub fn create_download_progress(total_bytes: Option<u64>, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = match total_bytes {
        Some(total) if total > 0 => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("Downloading {bar:40.cyan/blue} {percent}% ({bytes}/{total_bytes})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░ "),
            );
            pb
        }
        _ => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} Downloading {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        }
    };
    Some(pb)
}

/// Create a progress bar for converting chunks.
pub fn create_chunk_progress(total_chunks: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_chunks == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_chunks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chunks {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

/// Increment a progress bar.
pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}

/// Format seconds as `H:MM:SS` or `M:SS`.
pub fn format_duration(secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = secs.max(0.0).round() as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_is_none() {
        assert!(create_download_progress(Some(100), false).is_none());
        assert!(create_chunk_progress(3, false).is_none());
        assert!(create_chunk_progress(0, true).is_none());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(50.4), "0:50");
        assert_eq!(format_duration(650.0), "10:50");
        assert_eq!(format_duration(3725.0), "1:02:05");
    }
}
