//! Pipeline stages and the remote calls that drive them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a run in the Script → Images → Video → Done sequence.
///
/// A run only ever moves forward. Regenerating a single scene image does not
/// change the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Script,
    Images,
    Video,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Script => "script",
            Stage::Images => "images",
            Stage::Video => "video",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One kind of remote generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Script,
    Image,
    Video,
    Poster,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Script => "script",
            StageKind::Image => "image",
            StageKind::Video => "video",
            StageKind::Poster => "poster",
        }
    }

    /// Error text used when a service reports failure without saying why.
    pub fn default_error(self) -> &'static str {
        match self {
            StageKind::Script => "Unknown error occurred",
            StageKind::Image => "Image generation failed",
            StageKind::Video => "Video generation failed",
            StageKind::Poster => "Poster generation failed",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
