//! Media tool boundaries: probing, extraction, splitting, joining, remuxing.

pub mod combine;
pub mod extract;
pub mod probe;
pub mod remux;
pub mod split;
pub mod tool;

pub use combine::combine_chunks;
pub use extract::extract_audio;
pub use probe::duration;
pub use remux::remux;
pub use split::{AudioChunk, ChunkSpan, plan_chunks, split_audio};
pub use tool::{ToolCommand, ToolOutput};
