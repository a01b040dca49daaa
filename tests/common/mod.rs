//! Shared test harness for integration tests.
//!
//! Provides [`ScriptedStageClient`], an in-memory [`StageClient`] whose
//! responses are queued per stage (and per scene for images) and which
//! records every request it receives.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use cinegen::client::{
    ImageOutput, ImageRequest, PosterOutput, ScriptOutput, StageClient, VideoOutput, VideoRequest,
};
use cinegen::pipeline::PipelineOrchestrator;
use cinegen_core::{Brief, SceneSpec, StageFailure, StageResult};

pub const VIDEO_PATH: &str = "/static/output/movie.mp4";
pub const POSTER_PATH: &str = "/static/output/poster.jpg";

pub fn brief() -> Brief {
    Brief {
        title: "The Last Light".into(),
        genre: "Sci-Fi".into(),
        description: "A lighthouse keeper on a dying planet.".into(),
        style: "Cinematic".into(),
        scene_count: 3,
    }
}

pub fn scenes(ids: &[u32]) -> Vec<SceneSpec> {
    ids.iter()
        .map(|&id| SceneSpec {
            id,
            title: Some(format!("Scene {}: Title", id)),
            content: format!("Content of scene {}", id),
        })
        .collect()
}

pub fn image_path(scene_id: u32) -> String {
    format!("/static/output/scene_{}.jpg", scene_id)
}

pub fn service_failure(error: &str, suggestion: Option<&str>) -> StageFailure {
    StageFailure::service(error, suggestion.map(str::to_string))
}

#[derive(Default)]
struct Script {
    scripts: VecDeque<StageResult<ScriptOutput>>,
    images: HashMap<u32, VecDeque<StageResult<String>>>,
    videos: VecDeque<StageResult<VideoOutput>>,
    posters: VecDeque<StageResult<PosterOutput>>,
}

#[derive(Default)]
struct Recorded {
    script_calls: usize,
    image_requests: Vec<ImageRequest>,
    video_requests: Vec<VideoRequest>,
    poster_calls: usize,
}

/// [`StageClient`] answering from queued responses.
///
/// When a queue is empty the stage succeeds: the script with the configured
/// scenes, images with [`image_path`], video with [`VIDEO_PATH`].
pub struct ScriptedStageClient {
    scenes: Vec<SceneSpec>,
    script: Mutex<Script>,
    recorded: Mutex<Recorded>,
}

impl ScriptedStageClient {
    pub fn new(scene_ids: &[u32]) -> Self {
        Self {
            scenes: scenes(scene_ids),
            script: Mutex::new(Script::default()),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub fn script_responds(&self, outcome: StageResult<ScriptOutput>) -> &Self {
        self.script.lock().scripts.push_back(outcome);
        self
    }

    pub fn image_responds(&self, scene_id: u32, outcome: StageResult<String>) -> &Self {
        self.script
            .lock()
            .images
            .entry(scene_id)
            .or_default()
            .push_back(outcome);
        self
    }

    pub fn video_responds(&self, outcome: StageResult<VideoOutput>) -> &Self {
        self.script.lock().videos.push_back(outcome);
        self
    }

    pub fn poster_responds(&self, outcome: StageResult<PosterOutput>) -> &Self {
        self.script.lock().posters.push_back(outcome);
        self
    }

    pub fn script_calls(&self) -> usize {
        self.recorded.lock().script_calls
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.recorded.lock().image_requests.clone()
    }

    pub fn video_requests(&self) -> Vec<VideoRequest> {
        self.recorded.lock().video_requests.clone()
    }

    pub fn poster_calls(&self) -> usize {
        self.recorded.lock().poster_calls
    }
}

#[async_trait::async_trait]
impl StageClient for ScriptedStageClient {
    async fn generate_script(&self, _brief: &Brief) -> StageResult<ScriptOutput> {
        self.recorded.lock().script_calls += 1;
        let queued = self.script.lock().scripts.pop_front();
        queued.unwrap_or_else(|| {
            Ok(ScriptOutput {
                script: self
                    .scenes
                    .iter()
                    .map(|s| format!("{}\n{}", s.title.as_deref().unwrap_or(""), s.content))
                    .collect::<Vec<_>>()
                    .join("\n\n"),
                scenes: self.scenes.clone(),
                message: None,
            })
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> StageResult<ImageOutput> {
        self.recorded.lock().image_requests.push(request.clone());
        let queued = self
            .script
            .lock()
            .images
            .get_mut(&request.scene_id)
            .and_then(VecDeque::pop_front);
        queued
            .unwrap_or_else(|| Ok(image_path(request.scene_id)))
            .map(|image_path| ImageOutput {
                image_path,
                message: None,
            })
    }

    async fn generate_video(&self, request: &VideoRequest) -> StageResult<VideoOutput> {
        self.recorded.lock().video_requests.push(request.clone());
        let queued = self.script.lock().videos.pop_front();
        queued.unwrap_or_else(|| {
            Ok(VideoOutput {
                video_path: VIDEO_PATH.into(),
                message: None,
            })
        })
    }

    async fn generate_poster(&self, _brief: &Brief) -> StageResult<PosterOutput> {
        self.recorded.lock().poster_calls += 1;
        let queued = self.script.lock().posters.pop_front();
        queued.unwrap_or_else(|| {
            Ok(PosterOutput {
                poster_path: POSTER_PATH.into(),
            })
        })
    }
}

/// An orchestrator over a fresh [`ScriptedStageClient`].
pub fn orchestrator(scene_ids: &[u32]) -> (PipelineOrchestrator, Arc<ScriptedStageClient>) {
    let client = Arc::new(ScriptedStageClient::new(scene_ids));
    let orchestrator = PipelineOrchestrator::new(client.clone());
    (orchestrator, client)
}
