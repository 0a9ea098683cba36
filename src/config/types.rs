//! Configuration type definitions.

use crate::constants::{DEFAULT_CHUNK_SECS, DEFAULT_WORKERS, converter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External media tool locations.
    pub tools: ToolPaths,

    /// Voice conversion process settings.
    pub converter: InferenceSettings,

    /// Voice to model lookup table.
    pub voices: VoiceTable,

    /// Chunking and concurrency settings.
    pub pipeline: PipelineConfig,
}

/// Locations of the ffmpeg tool pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolPaths {
    /// Transcoder used for extraction, splitting, joining and remuxing.
    pub ffmpeg: PathBuf,
    /// Media inspection tool used for duration queries.
    pub ffprobe: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

/// Fixed inference settings passed to every conversion call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceSettings {
    /// Program that runs the inference script.
    pub interpreter: PathBuf,
    /// Inference CLI script.
    pub script: PathBuf,
    /// Working directory for the conversion process (None = current dir).
    pub working_dir: Option<PathBuf>,
    /// Pitch detection method.
    pub f0_method: String,
    /// Feature index blend ratio (0.0-1.0).
    pub index_rate: f32,
    /// Device selector, e.g. `cuda:0` or `cpu`.
    pub device: String,
    /// Half-precision inference.
    pub is_half: bool,
    /// Median filter radius for pitch results.
    pub filter_radius: u32,
    /// Output resample rate in Hz.
    pub resample_rate: u32,
    /// Volume envelope mix ratio (0.0-1.0).
    pub rms_mix_rate: f32,
    /// Voiceless consonant protection (0.0-0.5).
    pub protect: f32,
    /// Pitch shift in semitones.
    pub pitch_shift: i32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(converter::INTERPRETER),
            script: PathBuf::from(converter::SCRIPT),
            working_dir: None,
            f0_method: converter::F0_METHOD.to_string(),
            index_rate: converter::INDEX_RATE,
            device: converter::DEVICE.to_string(),
            is_half: false,
            filter_radius: converter::FILTER_RADIUS,
            resample_rate: converter::RESAMPLE_RATE,
            rms_mix_rate: converter::RMS_MIX_RATE,
            protect: converter::PROTECT,
            pitch_shift: converter::PITCH_SHIFT,
        }
    }
}

/// Model and companion index file for one voice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceModel {
    /// Model weights name as understood by the inference script.
    pub model: String,
    /// Feature index file.
    pub index: PathBuf,
}

/// Two-way voice lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VoiceTable {
    /// Model used for [`Voice::Male`].
    pub male: VoiceModel,
    /// Model used for [`Voice::Female`].
    pub female: VoiceModel,
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self {
            male: VoiceModel {
                model: converter::MALE_MODEL.to_string(),
                index: PathBuf::from(converter::MALE_INDEX),
            },
            female: VoiceModel {
                model: converter::FEMALE_MODEL.to_string(),
                index: PathBuf::from(converter::FEMALE_INDEX),
            },
        }
    }
}

impl VoiceTable {
    /// Model pair for a voice.
    #[must_use]
    pub fn lookup(&self, voice: Voice) -> &VoiceModel {
        match voice {
            Voice::Male => &self.male,
            Voice::Female => &self.female,
        }
    }
}

/// Chunking and concurrency settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Chunk duration in seconds.
    pub chunk_secs: f64,
    /// Number of concurrent conversion workers.
    pub workers: usize,
    /// Default voice when none is given on the command line.
    pub voice: Voice,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_secs: DEFAULT_CHUNK_SECS,
            workers: DEFAULT_WORKERS,
            voice: Voice::Male,
        }
    }
}

/// Target voice for conversion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Male voice model.
    #[default]
    #[value(alias = "m")]
    Male,
    /// Female voice model.
    #[value(alias = "f")]
    Female,
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_value_enum_accepts_aliases() {
        use clap::ValueEnum;

        assert_eq!(Voice::from_str("male", false).ok(), Some(Voice::Male));
        assert_eq!(Voice::from_str("Female", true).ok(), Some(Voice::Female));
        assert_eq!(Voice::from_str("m", false).ok(), Some(Voice::Male));
        assert_eq!(Voice::from_str("f", false).ok(), Some(Voice::Female));
        assert!(Voice::from_str("robot", true).is_err());
    }

    #[test]
    fn test_voice_display() {
        assert_eq!(Voice::Male.to_string(), "male");
        assert_eq!(Voice::Female.to_string(), "female");
    }

    #[test]
    fn test_voice_table_lookup_is_two_way() {
        let table = VoiceTable::default();
        assert_eq!(table.lookup(Voice::Male).model, "AndyField_350e_5950s.pth");
        assert_eq!(table.lookup(Voice::Female).model, "NikkiDorkDiaries.pth");
        assert_ne!(table.lookup(Voice::Male), table.lookup(Voice::Female));
    }

    #[test]
    fn test_pipeline_defaults() {
        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.chunk_secs, 300.0);
        assert_eq!(pipeline.workers, 4);
        assert_eq!(pipeline.voice, Voice::Male);
    }

    #[test]
    fn test_inference_defaults_match_rvc_cli() {
        let settings = InferenceSettings::default();
        assert_eq!(settings.f0_method, "harvest");
        assert_eq!(settings.index_rate, 0.7);
        assert_eq!(settings.resample_rate, 44_100);
        assert_eq!(settings.rms_mix_rate, 0.5);
        assert_eq!(settings.protect, 0.33);
        assert_eq!(settings.pitch_shift, 0);
        assert!(!settings.is_half);
    }
}
