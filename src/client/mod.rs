//! Adapters for the remote generation stages.
//!
//! Every call resolves to a [`StageResult`]: a transport problem and a
//! service-reported failure look the same to the orchestrator.

pub mod http;
pub mod wire;

pub use http::HttpStageClient;
pub use wire::{
    ImageOutput, ImageRequest, PosterOutput, ScriptOutput, VideoOutput, VideoRequest,
};

use cinegen_core::{Brief, StageResult};

/// One operation per remote generation stage.
#[async_trait::async_trait]
pub trait StageClient: Send + Sync {
    /// Write a script for the brief and split it into scenes.
    async fn generate_script(&self, brief: &Brief) -> StageResult<ScriptOutput>;

    /// Render the image for one scene.
    async fn generate_image(&self, request: &ImageRequest) -> StageResult<ImageOutput>;

    /// Compose the final video from scene images.
    async fn generate_video(&self, request: &VideoRequest) -> StageResult<VideoOutput>;

    /// Render a poster for the finished movie.
    async fn generate_poster(&self, brief: &Brief) -> StageResult<PosterOutput>;
}
