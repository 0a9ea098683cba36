//! Configuration validation.

use crate::config::{Config, InferenceSettings, VoiceModel};
use crate::constants::MAX_WORKERS;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_pipeline(config.pipeline.chunk_secs, config.pipeline.workers)?;
    validate_inference(&config.converter)?;
    validate_voice("male", &config.voices.male)?;
    validate_voice("female", &config.voices.female)?;
    Ok(())
}

/// Validate chunk duration and worker count.
pub fn validate_pipeline(chunk_secs: f64, workers: usize) -> Result<()> {
    if !chunk_secs.is_finite() || chunk_secs <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("chunk_secs must be a positive number, got {chunk_secs}"),
        });
    }

    if !(1..=MAX_WORKERS).contains(&workers) {
        return Err(Error::ConfigValidation {
            message: format!("workers must be between 1 and {MAX_WORKERS}, got {workers}"),
        });
    }

    Ok(())
}

/// Validate inference settings.
fn validate_inference(settings: &InferenceSettings) -> Result<()> {
    check_ratio("index_rate", settings.index_rate, 1.0)?;
    check_ratio("rms_mix_rate", settings.rms_mix_rate, 1.0)?;
    check_ratio("protect", settings.protect, 0.5)?;

    if settings.resample_rate == 0 {
        return Err(Error::ConfigValidation {
            message: "resample_rate must be greater than 0".to_string(),
        });
    }

    if settings.f0_method.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "f0_method must not be empty".to_string(),
        });
    }

    Ok(())
}

fn check_ratio(name: &str, value: f32, max: f32) -> Result<()> {
    if !(0.0..=max).contains(&value) {
        return Err(Error::ConfigValidation {
            message: format!("{name} must be between 0.0 and {max}, got {value}"),
        });
    }
    Ok(())
}

/// Validate a voice table entry.
fn validate_voice(name: &str, voice: &VoiceModel) -> Result<()> {
    if voice.model.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("voices.{name}.model must not be empty"),
        });
    }

    if voice.index.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("voices.{name}.index must not be empty"),
        });
    }

    Ok(())
}
