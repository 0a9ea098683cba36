//! User-facing progress output.

pub mod progress;
mod reporter;

pub use reporter::{
    ConsoleReporter, JobSummary, NullReporter, ProgressReporter, ProgressThrottler, Stage,
};
