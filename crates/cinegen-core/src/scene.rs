//! Scene data model.
//!
//! [`SceneSpec`] is what the script stage returns for each scene;
//! [`SceneItem`] is the tracked, mutable state of that scene during the
//! image stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one scene's image generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl SceneStatus {
    /// Whether the last call for this scene has resolved.
    pub fn is_terminal(self) -> bool {
        matches!(self, SceneStatus::Success | SceneStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneStatus::Pending => "pending",
            SceneStatus::Processing => "processing",
            SceneStatus::Success => "success",
            SceneStatus::Error => "error",
        }
    }
}

impl fmt::Display for SceneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scene as returned by the script stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSpec {
    pub id: u32,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

/// Tracked state of one scene within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneItem {
    pub id: u32,
    pub title: Option<String>,
    pub content: String,
    pub status: SceneStatus,
    /// Generated image reference; only set while `status` is `Success`.
    pub artifact_path: Option<String>,
    pub error_message: Option<String>,
    pub suggestion: Option<String>,
}

impl SceneItem {
    pub fn pending(spec: SceneSpec) -> Self {
        Self {
            id: spec.id,
            title: spec.title,
            content: spec.content,
            status: SceneStatus::Pending,
            artifact_path: None,
            error_message: None,
            suggestion: None,
        }
    }

    /// The scene title, or "Scene N" when the script gave none.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Scene {}", self.id),
        }
    }

    pub fn mark_processing(&mut self) {
        self.status = SceneStatus::Processing;
        self.artifact_path = None;
        self.error_message = None;
        self.suggestion = None;
    }

    pub fn mark_success(&mut self, artifact_path: &str) {
        self.status = SceneStatus::Success;
        self.artifact_path = Some(artifact_path.to_string());
        self.error_message = None;
        self.suggestion = None;
    }

    pub fn mark_error(&mut self, message: &str, suggestion: Option<&str>) {
        self.status = SceneStatus::Error;
        self.artifact_path = None;
        self.error_message = Some(message.to_string());
        self.suggestion = suggestion.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> SceneItem {
        SceneItem::pending(SceneSpec {
            id: 4,
            title: None,
            content: "A storm rolls in.".into(),
        })
    }

    #[test]
    fn pending_item_has_no_artifact() {
        let item = item();
        assert_eq!(item.status, SceneStatus::Pending);
        assert!(item.artifact_path.is_none());
        assert!(!item.status.is_terminal());
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let mut item = item();
        assert_eq!(item.display_title(), "Scene 4");
        item.title = Some("  ".into());
        assert_eq!(item.display_title(), "Scene 4");
        item.title = Some("Scene 4: The Storm".into());
        assert_eq!(item.display_title(), "Scene 4: The Storm");
    }

    #[test]
    fn error_then_processing_clears_error() {
        let mut item = item();
        item.mark_error("policy violation", Some("rephrase scene"));
        assert_eq!(item.status, SceneStatus::Error);
        assert_eq!(item.suggestion.as_deref(), Some("rephrase scene"));

        item.mark_processing();
        assert_eq!(item.status, SceneStatus::Processing);
        assert!(item.error_message.is_none());
        assert!(item.suggestion.is_none());
    }

    #[test]
    fn artifact_only_kept_on_success() {
        let mut item = item();
        item.mark_success("/static/output/scene_4.jpg");
        assert_eq!(item.artifact_path.as_deref(), Some("/static/output/scene_4.jpg"));

        item.mark_processing();
        assert!(item.artifact_path.is_none());
    }

    #[test]
    fn spec_title_is_optional() {
        let spec: SceneSpec = serde_json::from_str(r#"{"id":2,"content":"x"}"#).unwrap();
        assert_eq!(spec.title, None);
    }
}
