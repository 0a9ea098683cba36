//! Voice conversion of a single chunk.

mod rvc;
mod scratch;

pub use rvc::{RvcConverter, inference_command};
pub use scratch::ScratchPair;

use crate::config::Voice;
use crate::error::Result;

/// Transforms raw chunk audio into the target voice.
///
/// Implementations must be safe to call from several workers at once.
pub trait VoiceConverter: Send + Sync {
    /// Convert `audio` (a complete WAV file) and return the converted WAV bytes.
    fn convert(&self, audio: &[u8], voice: Voice) -> Result<Vec<u8>>;
}
