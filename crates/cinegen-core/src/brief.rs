//! The creative brief a run is generated from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scene count pre-selected by the wizard.
pub const DEFAULT_SCENE_COUNT: u32 = 5;

/// Largest scene count the wizard offers.
pub const MAX_SCENE_COUNT: u32 = 12;

/// The user's creative brief, submitted to the script stage.
///
/// A `Brief` is only built from a fully validated wizard draft and is not
/// modified afterwards; the orchestrator keeps its own copy for the image,
/// video and poster requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brief {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub style: String,
    #[serde(rename = "numScenes", alias = "sceneCount")]
    pub scene_count: u32,
}

impl Brief {
    /// The title with each run of whitespace replaced by `_`.
    pub fn slug(&self) -> String {
        self.title.split_whitespace().collect::<Vec<_>>().join("_")
    }

    /// File name to save the finished video under, stamped with `at` so
    /// repeated downloads of the same title do not collide.
    pub fn download_name(&self, at: DateTime<Utc>) -> String {
        format!("{}_{}.mp4", self.slug(), at.timestamp_millis())
    }
}
