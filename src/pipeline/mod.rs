//! The generation pipeline: script, per-scene images, video.

pub mod orchestrator;
pub mod progress;
pub mod queue;
pub mod tracker;

pub use orchestrator::{
    ImageJob, ImagesReport, ItemFailure, PipelineOrchestrator, PipelineRun, PosterReport,
    RegenerateOutcome, ScriptReport, VideoReport,
};
pub use progress::Progress;
pub use queue::ImageQueue;
pub use tracker::{ItemTicket, SceneItemTracker, StatusCounts};
