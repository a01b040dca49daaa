//! Drives a run through Script → Images → Video → Done.
//!
//! Each stage is one awaited call on the [`StageClient`]. The orchestrator
//! owns the run; every operation takes `&mut self`, so at most one stage call
//! is in flight for a run at a time. Single-scene retries can also be driven
//! outside that borrow through [`PipelineOrchestrator::begin_regenerate`],
//! [`ImageJob::run`] and [`PipelineOrchestrator::finish_regenerate`].

use std::collections::HashSet;
use std::sync::Arc;

use cinegen_core::events::{EventBus, EventPayload};
use cinegen_core::{
    Brief, Error, Result, RunId, SceneItem, SceneSpec, Stage, StageFailure, StageKind,
    StageResult,
};
use serde::Serialize;

use super::progress::{self, Progress};
use super::queue::ImageQueue;
use super::tracker::{ItemTicket, SceneItemTracker};
use crate::client::{ImageRequest, StageClient, VideoRequest};

/// State of one generation run.
#[derive(Debug)]
pub struct PipelineRun {
    id: RunId,
    stage: Stage,
    brief: Option<Brief>,
    script: Option<String>,
    tracker: SceneItemTracker,
    images_started: bool,
    images_complete: bool,
    video_artifact: Option<String>,
    poster_artifact: Option<String>,
}

impl PipelineRun {
    fn new() -> Self {
        Self {
            id: RunId::new(),
            stage: Stage::Script,
            brief: None,
            script: None,
            tracker: SceneItemTracker::new(),
            images_started: false,
            images_complete: false,
            video_artifact: None,
            poster_artifact: None,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The submitted brief, once the script stage has succeeded.
    pub fn brief(&self) -> Option<&Brief> {
        self.brief.as_ref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn items(&self) -> &[SceneItem] {
        self.tracker.snapshot()
    }

    pub fn images_started(&self) -> bool {
        self.images_started
    }

    /// Whether the image loop has visited every scene.
    pub fn images_complete(&self) -> bool {
        self.images_complete
    }

    pub fn video_artifact(&self) -> Option<&str> {
        self.video_artifact.as_deref()
    }

    pub fn poster_artifact(&self) -> Option<&str> {
        self.poster_artifact.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    pub run_id: RunId,
    pub script: String,
    pub scenes: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    pub scene_id: u32,
    pub failure: StageFailure,
}

/// Outcome of the whole image loop. Individual failures do not fail the
/// stage; they are listed here and left on their scene for retry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagesReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
}

impl ImagesReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegenerateOutcome {
    Succeeded { artifact_path: String },
    Failed(StageFailure),
    /// A newer request for the same scene was issued before this one
    /// resolved; its outcome was discarded.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoReport {
    pub video_path: String,
    /// Number of scene images the video was composed from
    pub images_used: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosterReport {
    pub poster_path: String,
}

/// A single scene image request, detached from the orchestrator.
#[derive(Debug, Clone)]
pub struct ImageJob {
    ticket: ItemTicket,
    request: ImageRequest,
}

impl ImageJob {
    pub fn index(&self) -> usize {
        self.ticket.index()
    }

    pub fn request(&self) -> &ImageRequest {
        &self.request
    }

    /// Issue the image call. The outcome must be handed back to
    /// [`PipelineOrchestrator::finish_regenerate`].
    pub async fn run(&self, client: &dyn StageClient) -> StageResult<String> {
        client
            .generate_image(&self.request)
            .await
            .map(|output| output.image_path)
    }
}

pub struct PipelineOrchestrator {
    client: Arc<dyn StageClient>,
    events: Arc<EventBus>,
    run: PipelineRun,
}

impl PipelineOrchestrator {
    pub fn new(client: Arc<dyn StageClient>) -> Self {
        Self::with_events(client, Arc::new(EventBus::default()))
    }

    pub fn with_events(client: Arc<dyn StageClient>, events: Arc<EventBus>) -> Self {
        Self {
            client,
            events,
            run: PipelineRun::new(),
        }
    }

    pub fn run(&self) -> &PipelineRun {
        &self.run
    }

    pub fn stage(&self) -> Stage {
        self.run.stage
    }

    pub fn snapshot(&self) -> &[SceneItem] {
        self.run.tracker.snapshot()
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn client(&self) -> Arc<dyn StageClient> {
        Arc::clone(&self.client)
    }

    pub fn progress(&self) -> Progress {
        progress::compute(
            self.run.stage,
            self.run.images_complete,
            self.run.tracker.snapshot(),
        )
    }

    /// Discard the current run and start a fresh one.
    pub fn reset(&mut self) {
        tracing::info!("Discarding run {}", self.run.id);
        self.run = PipelineRun::new();
    }

    /// Whether [`generate_script`](Self::generate_script) may run now: before
    /// any script exists, or to replace a script whose images have not been
    /// started.
    pub fn check_script_ready(&self) -> Result<()> {
        match self.run.stage {
            Stage::Script => Ok(()),
            Stage::Images if !self.run.images_started => Ok(()),
            stage => Err(Error::InvalidState(format!(
                "script can no longer change (run is at the {} stage{})",
                stage,
                if stage == Stage::Images {
                    ", images already started"
                } else {
                    ""
                }
            ))),
        }
    }

    /// Run the script stage.
    ///
    /// On failure the run keeps its current stage and script, and the call
    /// may be repeated. A second success before the image stage replaces the
    /// script and reseeds every scene as pending.
    pub async fn generate_script(&mut self, brief: Brief) -> Result<ScriptReport> {
        self.check_script_ready()?;

        tracing::info!(
            "Generating script for '{}' ({} scenes)",
            brief.title,
            brief.scene_count
        );
        self.publish(EventPayload::StageStarted {
            stage: StageKind::Script,
        });

        let output = match self.client.generate_script(&brief).await {
            Ok(output) => output,
            Err(failure) => return Err(self.stage_failed(StageKind::Script, failure)),
        };
        if let Err(failure) = check_scenes(&output.scenes) {
            return Err(self.stage_failed(StageKind::Script, failure));
        }

        let scenes = output.scenes.len();
        if self.run.script.is_some() {
            tracing::info!("Replacing the previous script");
        }
        self.run.tracker.seed(output.scenes);
        self.run.brief = Some(brief);
        self.run.script = Some(output.script.clone());
        self.run.stage = Stage::Images;

        tracing::info!("Script ready with {} scenes", scenes);
        self.publish(EventPayload::StageCompleted {
            stage: StageKind::Script,
            artifact: None,
        });

        Ok(ScriptReport {
            run_id: self.run.id,
            script: output.script,
            scenes,
            message: output.message,
        })
    }

    /// Ask for a new script for the brief already submitted. Only allowed
    /// until the image stage starts.
    pub async fn regenerate_script(&mut self) -> Result<ScriptReport> {
        if self.run.stage != Stage::Images {
            return Err(Error::InvalidState(format!(
                "no script to regenerate (run is at the {} stage)",
                self.run.stage
            )));
        }
        let brief = self.brief()?.clone();
        self.generate_script(brief).await
    }

    /// Render every scene image, one at a time in scene order.
    ///
    /// A failed scene is recorded and the loop moves on. Runs once per run;
    /// afterwards use [`regenerate`](Self::regenerate).
    pub async fn generate_images(&mut self) -> Result<ImagesReport> {
        if self.run.stage != Stage::Images || self.run.images_started {
            return Err(Error::InvalidState(format!(
                "image stage cannot start (run is at the {} stage{})",
                self.run.stage,
                if self.run.images_started {
                    ", images already generated"
                } else {
                    ""
                }
            )));
        }

        let total = self.run.tracker.len();
        self.run.images_started = true;
        tracing::info!("Generating {} scene images", total);
        self.publish(EventPayload::StageStarted {
            stage: StageKind::Image,
        });

        let mut queue = ImageQueue::new(total);
        let mut failures = Vec::new();

        while let Some(index) = queue.dequeue() {
            let job = self.start_job(index)?;
            let step = progress::image_step(index, total);
            tracing::info!("[{:.0}%] {}", step.percent, step.status);
            self.publish_progress(step);

            let outcome = job.run(self.client.as_ref()).await;
            if let Err(failure) = &outcome {
                failures.push(ItemFailure {
                    index,
                    scene_id: job.ticket.scene_id(),
                    failure: failure.clone(),
                });
            }
            self.settle(&job, outcome);
            queue.complete(index);
        }

        debug_assert!(queue.is_drained());
        self.run.images_complete = true;
        let done = progress::images_finished(self.run.tracker.snapshot());
        tracing::info!("{}", done.status);
        self.publish_progress(done);
        self.publish(EventPayload::StageCompleted {
            stage: StageKind::Image,
            artifact: None,
        });

        Ok(ImagesReport {
            total: queue.completed(),
            succeeded: self.run.tracker.counts().success,
            failures,
        })
    }

    /// Re-render one scene image. Leaves the stage and every other scene
    /// untouched.
    pub async fn regenerate(&mut self, index: usize) -> Result<RegenerateOutcome> {
        let job = self.begin_regenerate(index)?;
        let outcome = job.run(self.client.as_ref()).await;
        Ok(self.finish_regenerate(&job, outcome))
    }

    /// Mark scene `index` as processing and return the request to issue.
    pub fn begin_regenerate(&mut self, index: usize) -> Result<ImageJob> {
        if !self.run.images_started {
            return Err(Error::InvalidState(
                "scene images have not been generated yet".into(),
            ));
        }
        let len = self.run.tracker.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        tracing::info!("Regenerating image for scene {}", index + 1);
        self.start_job(index)
    }

    /// Apply the outcome of a job started with
    /// [`begin_regenerate`](Self::begin_regenerate).
    pub fn finish_regenerate(
        &mut self,
        job: &ImageJob,
        outcome: StageResult<String>,
    ) -> RegenerateOutcome {
        let result = match &outcome {
            Ok(path) => RegenerateOutcome::Succeeded {
                artifact_path: path.clone(),
            },
            Err(failure) => RegenerateOutcome::Failed(failure.clone()),
        };
        if self.settle(job, outcome) {
            result
        } else {
            RegenerateOutcome::Superseded
        }
    }

    /// Whether [`generate_video`](Self::generate_video) may run now: the
    /// image loop has finished (or a previous video attempt failed) and at
    /// least one scene image succeeded.
    pub fn check_video_ready(&self) -> Result<()> {
        let ready = match self.run.stage {
            Stage::Images => self.run.images_complete,
            Stage::Video => true,
            Stage::Script | Stage::Done => false,
        };
        if !ready {
            return Err(Error::InvalidState(format!(
                "video cannot be generated (run is at the {} stage)",
                self.run.stage
            )));
        }
        if self.run.tracker.counts().success == 0 {
            return Err(Error::NoArtifacts);
        }
        Ok(())
    }

    /// Compose the video from every successful scene image, in scene order.
    ///
    /// On failure the run stays at [`Stage::Video`]; calling again recomputes
    /// the image list, so scenes regenerated in the meantime are included.
    pub async fn generate_video(&mut self) -> Result<VideoReport> {
        self.check_video_ready()?;

        let images = self.run.tracker.successful_artifacts();
        let brief = self.brief()?.clone();

        self.run.stage = Stage::Video;
        let images_used = images.len();
        tracing::info!("Composing video from {} scene images", images_used);
        self.publish(EventPayload::StageStarted {
            stage: StageKind::Video,
        });
        self.publish_progress(self.progress());

        let request = VideoRequest {
            images,
            movie_data: brief,
        };
        let output = match self.client.generate_video(&request).await {
            Ok(output) => output,
            Err(failure) => return Err(self.stage_failed(StageKind::Video, failure)),
        };

        self.run.video_artifact = Some(output.video_path.clone());
        self.run.stage = Stage::Done;
        tracing::info!("Video ready at {}", output.video_path);
        self.publish(EventPayload::StageCompleted {
            stage: StageKind::Video,
            artifact: Some(output.video_path.clone()),
        });
        self.publish_progress(self.progress());

        Ok(VideoReport {
            video_path: output.video_path,
            images_used,
            message: output.message,
        })
    }

    /// Render a poster for a finished run. Does not change the stage.
    pub async fn generate_poster(&mut self) -> Result<PosterReport> {
        if self.run.stage != Stage::Done {
            return Err(Error::InvalidState(format!(
                "poster needs a finished video (run is at the {} stage)",
                self.run.stage
            )));
        }
        let brief = self.brief()?.clone();

        self.publish(EventPayload::StageStarted {
            stage: StageKind::Poster,
        });
        let output = match self.client.generate_poster(&brief).await {
            Ok(output) => output,
            Err(failure) => return Err(self.stage_failed(StageKind::Poster, failure)),
        };

        self.run.poster_artifact = Some(output.poster_path.clone());
        tracing::info!("Poster ready at {}", output.poster_path);
        self.publish(EventPayload::StageCompleted {
            stage: StageKind::Poster,
            artifact: Some(output.poster_path.clone()),
        });

        Ok(PosterReport {
            poster_path: output.poster_path,
        })
    }

    fn brief(&self) -> Result<&Brief> {
        self.run
            .brief
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no brief has been submitted".into()))
    }

    fn start_job(&mut self, index: usize) -> Result<ImageJob> {
        let brief = self.brief()?;
        let item = self.run.tracker.get(index);
        let request = ImageRequest {
            scene_id: item.id,
            scene_content: item.content.clone(),
            genre: brief.genre.clone(),
            style: brief.style.clone(),
        };

        let ticket = self.run.tracker.begin(index);
        self.publish(EventPayload::ItemProcessing {
            index,
            scene_id: ticket.scene_id(),
        });
        Ok(ImageJob { ticket, request })
    }

    /// Record an image outcome. Returns `false` if it was stale.
    fn settle(&mut self, job: &ImageJob, outcome: StageResult<String>) -> bool {
        let index = job.ticket.index();
        let scene_id = job.ticket.scene_id();

        if !self.run.tracker.settle(&job.ticket, &outcome) {
            tracing::debug!("Discarding stale image result for scene {}", index + 1);
            self.publish(EventPayload::ItemSuperseded { index, scene_id });
            return false;
        }

        match outcome {
            Ok(artifact_path) => {
                tracing::info!("Scene {} image ready: {}", index + 1, artifact_path);
                self.publish(EventPayload::ItemSucceeded {
                    index,
                    scene_id,
                    artifact_path,
                });
            }
            Err(failure) => {
                tracing::warn!("Scene {} image failed: {}", index + 1, failure.user_message());
                self.publish(EventPayload::ItemFailed {
                    index,
                    scene_id,
                    failure,
                });
            }
        }
        true
    }

    fn stage_failed(&self, stage: StageKind, failure: StageFailure) -> Error {
        tracing::error!("{} stage failed: {}", stage, failure.user_message());
        self.publish(EventPayload::StageFailed {
            stage,
            failure: failure.clone(),
        });
        Error::stage(stage, failure)
    }

    fn publish(&self, payload: EventPayload) {
        self.events.publish(self.run.id, payload);
    }

    fn publish_progress(&self, progress: Progress) {
        self.publish(EventPayload::Progress {
            stage: progress.stage,
            percent: progress.percent,
            status: progress.status,
        });
    }
}

/// Reject scene lists the image loop could not address unambiguously.
fn check_scenes(scenes: &[SceneSpec]) -> StageResult<()> {
    if scenes.is_empty() {
        return Err(StageFailure::service(
            "The script did not contain any scenes",
            Some("Try a longer description or a different scene count".into()),
        ));
    }
    let mut seen = HashSet::with_capacity(scenes.len());
    for scene in scenes {
        if scene.id == 0 {
            return Err(StageFailure::service(
                "Script returned a scene with id 0",
                None,
            ));
        }
        if !seen.insert(scene.id) {
            return Err(StageFailure::service(
                format!("Script returned duplicate scene id {}", scene.id),
                None,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: u32) -> SceneSpec {
        SceneSpec {
            id,
            title: None,
            content: "x".into(),
        }
    }

    #[test]
    fn scenes_need_unique_positive_ids() {
        assert!(check_scenes(&[spec(1), spec(5), spec(3)]).is_ok());
        assert!(check_scenes(&[]).is_err());
        assert!(check_scenes(&[spec(0)]).is_err());

        let dup = check_scenes(&[spec(2), spec(2)]).unwrap_err();
        assert_eq!(dup.error, "Script returned duplicate scene id 2");
        assert!(!dup.is_transport());
    }

    #[test]
    fn fresh_run_is_at_script() {
        let run = PipelineRun::new();
        assert_eq!(run.stage(), Stage::Script);
        assert!(run.items().is_empty());
        assert!(!run.images_started());
        assert!(run.video_artifact().is_none());
    }
}
