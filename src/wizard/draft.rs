//! The wizard's editable copy of the brief and its review summary.

use cinegen_core::{Brief, Error, Result};
use serde::Serialize;

/// Characters of the description shown on the review step.
const REVIEW_DESCRIPTION_LEN: usize = 100;

const NOT_SPECIFIED: &str = "Not specified";

/// Brief fields as the user is filling them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BriefDraft {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub style: String,
    pub scene_count: u32,
}

impl BriefDraft {
    pub fn new(scene_count: u32) -> Self {
        Self {
            scene_count,
            ..Default::default()
        }
    }

    /// Build the immutable brief. Fields are trimmed; every text field must
    /// be non-empty.
    pub fn to_brief(&self) -> Result<Brief> {
        Ok(Brief {
            title: required("title", &self.title)?,
            genre: required("genre", &self.genre)?,
            description: required("description", &self.description)?,
            style: required("style", &self.style)?,
            scene_count: self.scene_count,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// What the review step shows before the script is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub style: String,
    pub scene_count: String,
}

impl ReviewSummary {
    pub fn from_draft(draft: &BriefDraft) -> Self {
        Self {
            title: or_not_specified(&draft.title),
            genre: or_not_specified(&draft.genre),
            description: or_not_specified(&truncate(&draft.description, REVIEW_DESCRIPTION_LEN)),
            style: or_not_specified(&draft.style),
            scene_count: if draft.scene_count == 0 {
                NOT_SPECIFIED.to_string()
            } else {
                draft.scene_count.to_string()
            },
        }
    }

    /// Label and value pairs in display order.
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Movie Title", &self.title),
            ("Genre", &self.genre),
            ("Description", &self.description),
            ("Visual Style", &self.style),
            ("Number of Scenes", &self.scene_count),
        ]
    }
}

fn or_not_specified(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
