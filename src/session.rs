//! One user's pass through the wizard and the pipeline behind it.
//!
//! Every user action is a [`Command`]; [`WizardSession::dispatch`] applies
//! it to the wizard or the orchestrator and reports what happened.

use std::sync::Arc;

use cinegen_core::{Error, Result, Stage};

use crate::client::StageClient;
use crate::config::Config;
use crate::pipeline::{
    ImagesReport, PipelineOrchestrator, PosterReport, Progress, RegenerateOutcome, ScriptReport,
    VideoReport,
};
use crate::render::{self, SceneCardView};
use crate::wizard::{ReviewSummary, Section, WizardController};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetTitle(String),
    SetGenre(String),
    SetDescription(String),
    SetStyle(String),
    SetSceneCount(u32),
    Advance,
    Retreat,
    Review,
    SubmitBrief,
    /// Repeat the script request after a failure.
    RetryScript,
    /// Replace a script that has not been rendered yet with a new one for
    /// the same brief.
    RegenerateScript,
    GenerateImages,
    RegenerateItem(usize),
    GenerateVideo,
    GeneratePoster,
    EnterSection(Section),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A draft field was changed.
    Updated,
    /// The details step now shown.
    Step(u8),
    Review(ReviewSummary),
    Script(ScriptReport),
    Images(ImagesReport),
    Regenerated {
        index: usize,
        outcome: RegenerateOutcome,
    },
    Video(VideoReport),
    Poster(PosterReport),
    Section(Section),
}

pub struct WizardSession {
    wizard: WizardController,
    orchestrator: PipelineOrchestrator,
}

impl WizardSession {
    pub fn new(wizard: WizardController, orchestrator: PipelineOrchestrator) -> Self {
        Self {
            wizard,
            orchestrator,
        }
    }

    pub fn from_config(config: &Config, client: Arc<dyn StageClient>) -> Self {
        Self::new(
            WizardController::from_config(&config.wizard),
            PipelineOrchestrator::new(client),
        )
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn orchestrator(&self) -> &PipelineOrchestrator {
        &self.orchestrator
    }

    pub fn progress(&self) -> Progress {
        self.orchestrator.progress()
    }

    pub fn scene_cards(&self) -> Vec<SceneCardView> {
        render::scene_cards(self.orchestrator.snapshot())
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<CommandOutcome> {
        tracing::debug!("Dispatching {:?}", command);
        match command {
            Command::SetTitle(value) => self.edit(|w| w.set_title(value)),
            Command::SetGenre(value) => self.edit(|w| w.set_genre(value)),
            Command::SetDescription(value) => self.edit(|w| w.set_description(value)),
            Command::SetStyle(value) => self.edit(|w| w.set_style(value)),
            Command::SetSceneCount(count) => {
                self.ensure_editable()?;
                self.wizard.set_scene_count(count)?;
                Ok(CommandOutcome::Updated)
            }
            Command::Advance => Ok(CommandOutcome::Step(self.wizard.advance()?)),
            Command::Retreat => Ok(CommandOutcome::Step(self.wizard.retreat())),
            Command::Review => Ok(CommandOutcome::Review(self.wizard.review())),
            Command::SubmitBrief | Command::RetryScript => self.submit_brief().await,
            Command::RegenerateScript => {
                let report = self.orchestrator.regenerate_script().await?;
                self.wizard.enter_section(Section::Images);
                Ok(CommandOutcome::Script(report))
            }
            Command::GenerateImages => {
                let report = self.orchestrator.generate_images().await?;
                Ok(CommandOutcome::Images(report))
            }
            Command::RegenerateItem(index) => {
                let outcome = self.orchestrator.regenerate(index).await?;
                Ok(CommandOutcome::Regenerated { index, outcome })
            }
            Command::GenerateVideo => {
                self.orchestrator.check_video_ready()?;
                self.wizard.enter_section(Section::Video);
                let report = self.orchestrator.generate_video().await?;
                self.wizard.enter_section(Section::Result);
                Ok(CommandOutcome::Video(report))
            }
            Command::GeneratePoster => {
                let report = self.orchestrator.generate_poster().await?;
                Ok(CommandOutcome::Poster(report))
            }
            Command::EnterSection(section) => {
                self.wizard.enter_section(section);
                Ok(CommandOutcome::Section(section))
            }
        }
    }

    /// The section only moves once the run can take the request. A failed
    /// first script leaves the wizard on the script section, next to the
    /// run parked at [`Stage::Script`].
    async fn submit_brief(&mut self) -> Result<CommandOutcome> {
        let brief = self.wizard.submit()?;
        self.orchestrator.check_script_ready()?;
        let previous = self.wizard.section();
        self.wizard.enter_section(Section::Script);
        match self.orchestrator.generate_script(brief).await {
            Ok(report) => {
                self.wizard.enter_section(Section::Images);
                Ok(CommandOutcome::Script(report))
            }
            Err(err) => {
                // A replacement script failed; the earlier one still stands.
                if self.orchestrator.stage() != Stage::Script {
                    self.wizard.enter_section(previous);
                }
                Err(err)
            }
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut WizardController)) -> Result<CommandOutcome> {
        self.ensure_editable()?;
        apply(&mut self.wizard);
        Ok(CommandOutcome::Updated)
    }

    /// The brief is fixed once the script stage has accepted it.
    fn ensure_editable(&self) -> Result<()> {
        if self.orchestrator.stage() != Stage::Script {
            return Err(Error::InvalidState(
                "the brief cannot change after the script has been generated".into(),
            ));
        }
        Ok(())
    }
}
