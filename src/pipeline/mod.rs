//! Conversion pipeline: scratch workspace, worker pool and job driver.

mod coordinator;
mod job;
mod workspace;

pub use coordinator::{
    ChunkOutcome, ConversionRequest, ConversionResult, ConversionResults, Coordinator,
    processed_file_name,
};
pub use job::{
    ConvertedVideo, JobOptions, convert_video, fetch_source, finish_video, run_job,
};
pub use workspace::{JobWorkspace, cleanup_all_workspaces};
