//! The frame pipeline orchestrator and its progress contract.

pub mod job;
pub mod progress;

pub use job::{FrameSequence, JobState, OverlayJob};
pub use progress::{CollectingProgress, NullProgress, ProgressReport, ProgressSink};
