//! ffmpeg-backed tests for splitting, joining and remuxing.
//!
//! These need `ffmpeg` and `ffprobe` on `PATH`, so they are ignored by
//! default. Run them with `cargo test -- --ignored`; a missing tool then
//! fails the test instead of skipping it.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use voxshift::Result;
use voxshift::config::{ToolPaths, Voice};
use voxshift::convert::VoiceConverter;
use voxshift::media::{self, combine_chunks, split_audio};
use voxshift::output::NullReporter;
use voxshift::pipeline::{JobOptions, JobWorkspace, convert_video};

fn require_tools() {
    for tool in ["ffmpeg", "ffprobe"] {
        let found = Command::new(tool)
            .arg("-version")
            .output()
            .is_ok_and(|o| o.status.success());
        assert!(found, "{tool} not found on PATH");
    }
}

/// Writes a 3 second test pattern with a sine soundtrack to `path`.
fn synthesize_video(path: &Path) {
    let generated = Command::new("ffmpeg")
        .args([
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=64x64:rate=10:duration=3",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=440:duration=3",
            "-c:v",
            "mpeg4",
            "-c:a",
            "aac",
            "-shortest",
        ])
        .arg(path)
        .arg("-y")
        .output()
        .is_ok_and(|o| o.status.success());
    assert!(generated, "could not synthesize a test video");
}

/// Writes a 44.1 kHz stereo 16-bit sine of `secs` seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn write_sine(path: &Path, secs: f64) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let frames = (secs * 44_100.0) as usize;
    for n in 0..frames {
        let t = n as f64 / 44_100.0;
        let sample = ((t * 440.0 * std::f64::consts::TAU).sin() * 8_000.0) as i16;
        writer.write_sample(sample).unwrap();
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

fn wav_secs(path: &Path) -> f64 {
    let reader = WavReader::open(path).unwrap();
    f64::from(reader.duration()) / f64::from(reader.spec().sample_rate)
}

struct Passthrough;

impl VoiceConverter for Passthrough {
    fn convert(&self, audio: &[u8], _voice: Voice) -> Result<Vec<u8>> {
        Ok(audio.to_vec())
    }
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn test_probe_reports_wav_duration() {
    require_tools();
    let dir = TempDir::new().unwrap();
    let audio = dir.path().join("tone.wav");
    write_sine(&audio, 1.5);

    let secs = media::duration(&ToolPaths::default(), &audio).unwrap();
    assert!((secs - 1.5).abs() < 0.05, "got {secs}");
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn test_split_then_combine_preserves_duration() {
    require_tools();
    let tools = ToolPaths::default();
    let dir = TempDir::new().unwrap();
    let audio = dir.path().join("tone.wav");
    write_sine(&audio, 2.5);

    let chunks = split_audio(&tools, &audio, 1.0, &dir.path().join("chunks")).unwrap();
    assert_eq!(chunks.len(), 3);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
        let expected = if i < 2 { 1.0 } else { 0.5 };
        let actual = wav_secs(&chunk.path);
        assert!((actual - expected).abs() < 0.05, "chunk {i}: {actual}");
    }

    let ordered: Vec<_> = chunks.iter().map(|c| c.path.clone()).collect();
    let combined = combine_chunks(&tools, &ordered, &dir.path().join("combined.wav")).unwrap();
    let total = wav_secs(&combined);
    assert!((total - 2.5).abs() < 0.05, "combined: {total}");
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn test_single_chunk_is_copied() {
    require_tools();
    let tools = ToolPaths::default();
    let dir = TempDir::new().unwrap();
    let audio = dir.path().join("tone.wav");
    write_sine(&audio, 0.8);

    let out = combine_chunks(&tools, &[audio], &dir.path().join("combined.wav")).unwrap();
    assert!((wav_secs(&out) - 0.8).abs() < 0.05);
    assert!(!dir.path().join("concat.txt").exists());
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn test_convert_video_end_to_end_with_passthrough() {
    require_tools();
    let tools = ToolPaths::default();
    let parent = TempDir::new().unwrap();
    let workspace = JobWorkspace::create_in(parent.path()).unwrap();

    synthesize_video(&workspace.source_video());

    let options = JobOptions {
        voice: Voice::Male,
        chunk_secs: 1.0,
        workers: 2,
        output: parent.path().join("out.mp4"),
        keep_scratch: false,
    };
    let converted =
        convert_video(&tools, &Passthrough, &workspace, &options, &NullReporter).unwrap();

    // AAC priming can push the extracted audio just past 3s
    assert!((3..=4).contains(&converted.chunks), "chunks: {}", converted.chunks);
    assert!(converted.video.is_file());
    assert!(fs::read_dir(workspace.chunk_dir()).unwrap().next().is_none());

    let secs = media::duration(&tools, &converted.video).unwrap();
    assert!((secs - 3.0).abs() < 0.3, "final video: {secs}");
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn test_remux_container_follows_output_extension() {
    require_tools();
    let tools = ToolPaths::default();
    let parent = TempDir::new().unwrap();
    let workspace = JobWorkspace::create_in(parent.path()).unwrap();
    synthesize_video(&workspace.source_video());

    let options = JobOptions {
        voice: Voice::Female,
        chunk_secs: 2.0,
        workers: 2,
        output: parent.path().join("out.mkv"),
        keep_scratch: false,
    };
    let converted =
        convert_video(&tools, &Passthrough, &workspace, &options, &NullReporter).unwrap();

    assert!(converted.video.ends_with("final_video.mkv"));
    // EBML header magic of a Matroska file
    let bytes = fs::read(&converted.video).unwrap();
    assert_eq!(&bytes[..4], &[0x1A, 0x45, 0xDF, 0xA3]);
}
