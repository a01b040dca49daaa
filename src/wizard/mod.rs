//! Step-by-step collection of the brief.

mod controller;
mod draft;

pub use controller::{Section, WizardController, LAST_STEP};
pub use draft::{BriefDraft, ReviewSummary};
