//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "voxshift";

/// Default chunk duration in seconds.
pub const DEFAULT_CHUNK_SECS: f64 = 300.0;

/// Default number of concurrent conversion workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Maximum allowed worker count.
///
/// Every worker holds a conversion process (and usually a GPU context), so
/// this stays small.
pub const MAX_WORKERS: usize = 32;

/// Durations closer than this are considered equal when planning chunks.
pub const DURATION_EPSILON: f64 = 1e-9;

/// Fixed audio format for extracted audio and chunks.
pub mod audio_format {
    /// Sample rate in Hz.
    pub const SAMPLE_RATE: u32 = 44_100;
    /// Channel count.
    pub const CHANNELS: u16 = 2;
    /// PCM codec name as understood by ffmpeg.
    pub const PCM_CODEC: &str = "pcm_s16le";
    /// Denoise filter applied while extracting chunks.
    pub const DENOISE_FILTER: &str = "afftdn";
    /// Codec used for the audio stream of the final video.
    pub const REMUX_AUDIO_CODEC: &str = "aac";
}

/// Scratch file naming.
pub mod scratch {
    /// Prefix of the per-job scratch directory.
    pub const JOB_DIR_PREFIX: &str = "voxshift-";
    /// Downloaded or copied source video.
    pub const SOURCE_VIDEO: &str = "video.mp4";
    /// Extracted full-length audio.
    pub const EXTRACTED_AUDIO: &str = "audio.wav";
    /// Subdirectory holding split chunks.
    pub const CHUNK_DIR: &str = "chunks";
    /// Subdirectory holding converted chunks.
    pub const PROCESSED_DIR: &str = "processed";
    /// Subdirectory for dispatcher scratch files.
    pub const CONVERT_DIR: &str = "convert";
    /// Combined converted audio.
    pub const COMBINED_AUDIO: &str = "final_audio.wav";
    /// Final remuxed video inside the scratch dir. The extension follows
    /// the requested output path.
    pub const FINAL_VIDEO: &str = "final_video.mp4";
    /// Concat list consumed by ffmpeg's concat demuxer.
    pub const CONCAT_LIST: &str = "concat.txt";
}

/// Default output file name when none is given.
pub const DEFAULT_OUTPUT_FILE: &str = "accent_converted_video.mp4";

/// Voice conversion defaults.
pub mod converter {
    /// Interpreter used to launch the inference script.
    pub const INTERPRETER: &str = "python3";
    /// Inference CLI script, relative to the working directory.
    pub const SCRIPT: &str = "tools/infer_cli.py";
    /// Pitch detection method.
    pub const F0_METHOD: &str = "harvest";
    /// Feature index blend ratio.
    pub const INDEX_RATE: f32 = 0.7;
    /// Inference device.
    pub const DEVICE: &str = "cuda:0";
    /// Median filter radius for pitch results.
    pub const FILTER_RADIUS: u32 = 1;
    /// Output resample rate in Hz.
    pub const RESAMPLE_RATE: u32 = 44_100;
    /// Volume envelope mix ratio.
    pub const RMS_MIX_RATE: f32 = 0.5;
    /// Voiceless consonant protection.
    pub const PROTECT: f32 = 0.33;
    /// Pitch shift in semitones.
    pub const PITCH_SHIFT: i32 = 0;

    /// Default male voice model.
    pub const MALE_MODEL: &str = "AndyField_350e_5950s.pth";
    /// Default male voice index.
    pub const MALE_INDEX: &str = "AndyField.index";
    /// Default female voice model.
    pub const FEMALE_MODEL: &str = "NikkiDorkDiaries.pth";
    /// Default female voice index.
    pub const FEMALE_INDEX: &str = "added_IVF110_Flat_nprobe_1_NikkiDorkDiaries_v2.index";
}

/// HTTP download settings.
pub mod download {
    /// Connection timeout in seconds.
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;
}
