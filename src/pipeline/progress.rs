//! Progress of a run, measured per stage.
//!
//! Each stage has its own bar running from 0 to 100, the way each section
//! of the wizard shows its own progress. `percent` is therefore only
//! comparable between two values with the same `stage`; a consumer drawing
//! one bar for the whole run must reset it whenever `stage` changes.
//!
//! Everything here is a pure function of the run's stage and scene
//! statuses, so the view can recompute progress from any snapshot.

use cinegen_core::{SceneItem, Stage};
use serde::{Deserialize, Serialize};

use super::tracker::StatusCounts;

/// A percentage in `0.0..=100.0` of `stage`, and the line shown beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub stage: Stage,
    pub percent: f32,
    pub status: String,
}

impl Progress {
    fn new(stage: Stage, percent: f32, status: impl Into<String>) -> Self {
        Self {
            stage,
            percent: percent.clamp(0.0, 100.0),
            status: status.into(),
        }
    }
}

/// Progress just before the image call for `index` is issued.
pub fn image_step(index: usize, total: usize) -> Progress {
    if total == 0 {
        return Progress::new(Stage::Images, 100.0, "No scenes to render");
    }
    let percent = index as f32 / total as f32 * 100.0;
    Progress::new(
        Stage::Images,
        percent,
        format!("Generating image {} of {}...", index + 1, total),
    )
}

/// Progress once every scene has been visited. Always 100%, whatever the
/// individual outcomes were.
pub fn images_finished(items: &[SceneItem]) -> Progress {
    let failed = StatusCounts::of(items).error;
    let status = if failed == 0 {
        "✓ All images generated successfully!".to_string()
    } else {
        format!(
            "{} of {} images generated, {} failed",
            items.len() - failed,
            items.len(),
            failed
        )
    };
    Progress::new(Stage::Images, 100.0, status)
}

/// Progress for any point in a run.
///
/// While the image loop is running, the scenes before the in-flight one are
/// terminal and the rest are pending, so the count of terminal scenes is the
/// index being worked on.
pub fn compute(stage: Stage, images_complete: bool, items: &[SceneItem]) -> Progress {
    match stage {
        Stage::Script => Progress::new(Stage::Script, 0.0, "Generating your script..."),
        Stage::Images if images_complete => images_finished(items),
        Stage::Images => {
            let visited = items.iter().filter(|i| i.status.is_terminal()).count();
            image_step(visited.min(items.len().saturating_sub(1)), items.len())
        }
        Stage::Video => Progress::new(Stage::Video, 0.0, "Composing your video..."),
        Stage::Done => Progress::new(Stage::Done, 100.0, "✓ Video generation complete!"),
    }
}
