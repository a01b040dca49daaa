use cinegen_core::{Brief, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::draft::{BriefDraft, ReviewSummary};
use crate::config::WizardConfig;

/// Number of steps in the details form. The last one is the review.
pub const LAST_STEP: u8 = 6;

/// Top-level area of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Details,
    Script,
    Images,
    Video,
    Result,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Details => "Details",
            Section::Script => "Script",
            Section::Images => "Images",
            Section::Video => "Video",
            Section::Result => "Result",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "details" => Ok(Section::Details),
            "script" => Ok(Section::Script),
            "images" => Ok(Section::Images),
            "video" => Ok(Section::Video),
            "result" => Ok(Section::Result),
            _ => Err(Error::validation("section", format!("Unknown section: {}", s))),
        }
    }
}

/// Step and section state machine in front of the pipeline.
///
/// Moving forward through the details steps requires the current step's
/// field to be filled in; moving back never does.
#[derive(Debug, Clone)]
pub struct WizardController {
    step: u8,
    section: Section,
    draft: BriefDraft,
    max_scene_count: u32,
}

impl WizardController {
    pub fn new(default_scene_count: u32, max_scene_count: u32) -> Self {
        Self {
            step: 1,
            section: Section::Details,
            draft: BriefDraft::new(default_scene_count),
            max_scene_count,
        }
    }

    pub fn from_config(config: &WizardConfig) -> Self {
        Self::new(config.default_scene_count, config.max_scene_count)
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn draft(&self) -> &BriefDraft {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.draft.genre = genre.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.draft.style = style.into();
    }

    pub fn set_scene_count(&mut self, count: u32) -> Result<()> {
        if count == 0 || count > self.max_scene_count {
            return Err(Error::validation(
                "scene_count",
                format!(
                    "Please choose between 1 and {} scenes.",
                    self.max_scene_count
                ),
            ));
        }
        self.draft.scene_count = count;
        Ok(())
    }

    /// Check the field gathered at `step`.
    pub fn check(&self, step: u8) -> Result<()> {
        let (field, value, message) = match step {
            1 => (
                "title",
                &self.draft.title,
                "Please enter a movie title before proceeding.",
            ),
            2 => (
                "genre",
                &self.draft.genre,
                "Please select a genre before proceeding.",
            ),
            3 => (
                "description",
                &self.draft.description,
                "Please enter a movie description before proceeding.",
            ),
            4 => (
                "style",
                &self.draft.style,
                "Please select a visual style before proceeding.",
            ),
            // Scene count always holds a valid selection; 6 is the review.
            _ => return Ok(()),
        };
        if value.trim().is_empty() {
            return Err(Error::validation(field, message));
        }
        Ok(())
    }

    pub fn validate(&self, step: u8) -> bool {
        self.check(step).is_ok()
    }

    /// Move to the next step if the current one validates. Returns the step
    /// now shown.
    pub fn advance(&mut self) -> Result<u8> {
        self.check(self.step)?;
        if self.step < LAST_STEP {
            self.step += 1;
        }
        Ok(self.step)
    }

    pub fn retreat(&mut self) -> u8 {
        if self.step > 1 {
            self.step -= 1;
        }
        self.step
    }

    pub fn enter_section(&mut self, section: Section) {
        tracing::debug!("Entering {} section", section);
        self.section = section;
    }

    /// Overall wizard progress. The details steps share the first 20%.
    pub fn progress_percent(&self) -> f32 {
        match self.section {
            Section::Details => f32::from(self.step) / f32::from(LAST_STEP) * 20.0,
            Section::Script => 40.0,
            Section::Images => 60.0,
            Section::Video => 80.0,
            Section::Result => 100.0,
        }
    }

    pub fn review(&self) -> ReviewSummary {
        ReviewSummary::from_draft(&self.draft)
    }

    /// Validate every step and produce the brief for the script stage.
    pub fn submit(&self) -> Result<Brief> {
        for step in 1..=LAST_STEP {
            self.check(step)?;
        }
        self.draft.to_brief()
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::from_config(&WizardConfig::default())
    }
}
