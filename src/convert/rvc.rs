//! RVC inference CLI converter.

use super::VoiceConverter;
use super::scratch::ScratchPair;
use crate::config::{InferenceSettings, Voice, VoiceModel, VoiceTable};
use crate::error::{Error, Result};
use crate::media::ToolCommand;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Converts audio by running the RVC inference script once per call.
#[derive(Debug, Clone)]
pub struct RvcConverter {
    settings: InferenceSettings,
    voices: VoiceTable,
    scratch_dir: PathBuf,
}

impl RvcConverter {
    /// Create a converter that keeps its scratch files under `scratch_dir`.
    pub fn new(settings: InferenceSettings, voices: VoiceTable, scratch_dir: PathBuf) -> Self {
        Self {
            settings,
            voices,
            scratch_dir,
        }
    }

    /// Directory holding per-call scratch files.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Build the inference invocation for one call.
    pub fn command(&self, model: &VoiceModel, input: &Path, output: &Path) -> ToolCommand {
        inference_command(&self.settings, model, input, output)
    }
}

/// Build the inference CLI invocation from typed settings.
pub fn inference_command(
    settings: &InferenceSettings,
    model: &VoiceModel,
    input: &Path,
    output: &Path,
) -> ToolCommand {
    ToolCommand::new(&settings.interpreter)
        .arg(&settings.script)
        .arg("--input_path")
        .arg(input)
        .arg("--index_path")
        .arg(&model.index)
        .arg("--f0method")
        .arg(&settings.f0_method)
        .arg("--opt_path")
        .arg(output)
        .arg("--model_name")
        .arg(&model.model)
        .arg("--index_rate")
        .arg(settings.index_rate.to_string())
        .arg("--device")
        .arg(&settings.device)
        .arg("--is_half")
        .arg(if settings.is_half { "True" } else { "False" })
        .arg("--filter_radius")
        .arg(settings.filter_radius.to_string())
        .arg("--resample_sr")
        .arg(settings.resample_rate.to_string())
        .arg("--rms_mix_rate")
        .arg(settings.rms_mix_rate.to_string())
        .arg("--protect")
        .arg(settings.protect.to_string())
        .arg("--f0up_key")
        .arg(settings.pitch_shift.to_string())
        .current_dir(settings.working_dir.as_deref())
}

impl VoiceConverter for RvcConverter {
    fn convert(&self, audio: &[u8], voice: Voice) -> Result<Vec<u8>> {
        let model = self.voices.lookup(voice);
        let scratch = ScratchPair::new(&self.scratch_dir);

        fs::write(scratch.input(), audio)?;

        debug!(
            "Converting {} bytes with {} ({})",
            audio.len(),
            model.model,
            voice
        );
        self.command(model, scratch.input(), scratch.output())
            .run()?;

        if !scratch.output().is_file() {
            return Err(Error::OutputMissing {
                path: scratch.output().to_path_buf(),
            });
        }

        Ok(fs::read(scratch.output())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_command_default_arguments() {
        let settings = InferenceSettings::default();
        let voices = VoiceTable::default();
        let cmd = inference_command(
            &settings,
            voices.lookup(Voice::Female),
            Path::new("input_x.wav"),
            Path::new("voice_x.wav"),
        );

        assert_eq!(cmd.program(), Path::new("python3"));
        let args: Vec<_> = cmd.arguments().iter().map(|a| a.to_string_lossy()).collect();
        assert_eq!(
            args,
            [
                "tools/infer_cli.py",
                "--input_path",
                "input_x.wav",
                "--index_path",
                "added_IVF110_Flat_nprobe_1_NikkiDorkDiaries_v2.index",
                "--f0method",
                "harvest",
                "--opt_path",
                "voice_x.wav",
                "--model_name",
                "NikkiDorkDiaries.pth",
                "--index_rate",
                "0.7",
                "--device",
                "cuda:0",
                "--is_half",
                "False",
                "--filter_radius",
                "1",
                "--resample_sr",
                "44100",
                "--rms_mix_rate",
                "0.5",
                "--protect",
                "0.33",
                "--f0up_key",
                "0"
            ]
        );
    }

    #[test]
    fn test_male_voice_selects_male_model() {
        let voices = VoiceTable::default();
        let cmd = inference_command(
            &InferenceSettings::default(),
            voices.lookup(Voice::Male),
            Path::new("in.wav"),
            Path::new("out.wav"),
        );
        let args: Vec<_> = cmd.arguments().iter().map(|a| a.to_string_lossy()).collect();
        assert!(args.iter().any(|a| a == "AndyField_350e_5950s.pth"));
        assert!(args.iter().any(|a| a == "AndyField.index"));
    }
}
