//! Presentation of scene state.
//!
//! Turns tracked scenes into the values a view needs to draw a scene card.
//! Nothing here touches the run.

use cinegen_core::{SceneItem, SceneStatus};
use serde::Serialize;

/// Action offered on a scene card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Regenerate,
    TryAgain,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Regenerate => "🔄 Regenerate",
            CardAction::TryAgain => "🔄 Try Again",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneCardView {
    pub index: usize,
    pub title: String,
    /// e.g. "Scene 3 of 5"
    pub position: String,
    pub status: SceneStatus,
    pub status_line: String,
    pub image: Option<String>,
    pub action: Option<CardAction>,
}

/// Render scene `index` of a run with `total` scenes.
pub fn scene_card(index: usize, total: usize, item: &SceneItem) -> SceneCardView {
    let (status_line, action) = match item.status {
        SceneStatus::Pending => ("Waiting...".to_string(), None),
        SceneStatus::Processing => ("Processing...".to_string(), None),
        SceneStatus::Success => ("Ready".to_string(), Some(CardAction::Regenerate)),
        SceneStatus::Error => {
            let error = item.error_message.as_deref().unwrap_or("Unknown error");
            let line = match &item.suggestion {
                Some(suggestion) => format!("Error: {} - {}", error, suggestion),
                None => format!("Error: {}", error),
            };
            (line, Some(CardAction::TryAgain))
        }
    };

    SceneCardView {
        index,
        title: item.display_title(),
        position: format!("Scene {} of {}", item.id, total),
        status: item.status,
        status_line,
        image: item.artifact_path.clone(),
        action,
    }
}

pub fn scene_cards(items: &[SceneItem]) -> Vec<SceneCardView> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| scene_card(index, items.len(), item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegen_core::SceneSpec;

    fn item(id: u32) -> SceneItem {
        SceneItem::pending(SceneSpec {
            id,
            title: None,
            content: "Waves crash.".into(),
        })
    }

    #[test]
    fn success_card_shows_image_and_regenerate() {
        let mut scene = item(2);
        scene.mark_success("/static/output/scene_2.jpg");
        let card = scene_card(1, 3, &scene);
        assert_eq!(card.title, "Scene 2");
        assert_eq!(card.position, "Scene 2 of 3");
        assert_eq!(card.image.as_deref(), Some("/static/output/scene_2.jpg"));
        assert_eq!(card.action, Some(CardAction::Regenerate));
    }

    #[test]
    fn error_card_joins_suggestion() {
        let mut scene = item(1);
        scene.mark_error("policy violation", Some("rephrase scene"));
        let card = scene_card(0, 1, &scene);
        assert_eq!(card.status_line, "Error: policy violation - rephrase scene");
        assert_eq!(card.action, Some(CardAction::TryAgain));
        assert!(card.image.is_none());
    }

    #[test]
    fn processing_card_has_no_action() {
        let mut scene = item(1);
        scene.mark_processing();
        let cards = scene_cards(&[scene]);
        assert_eq!(cards[0].status_line, "Processing...");
        assert_eq!(cards[0].action, None);
    }
}
