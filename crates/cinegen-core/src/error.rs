//! Unified error type for the cinegen client.
//!
//! Remote stage calls never raise past the client boundary: a transport
//! problem and a service-reported failure both resolve to a [`StageFailure`].
//! Item-level failures are surfaced as-is; stage-level failures (script,
//! video, poster) are wrapped in [`Error::Stage`] and returned to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stage::StageKind;

/// Where a stage call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The call could not complete (timeout, connection failure, bad status).
    Transport,
    /// The service answered but reported `success: false`.
    Service,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Service => f.write_str("service"),
        }
    }
}

/// Normalized failure of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct StageFailure {
    pub kind: FailureKind,
    /// Error text; verbatim from the service for [`FailureKind::Service`].
    pub error: String,
    /// Optional remediation hint supplied by the service.
    pub suggestion: Option<String>,
}

impl StageFailure {
    pub fn transport(error: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            error: error.into(),
            suggestion: None,
        }
    }

    pub fn service(error: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            kind: FailureKind::Service,
            error: error.into(),
            suggestion,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind == FailureKind::Transport
    }

    /// Error text with the suggestion appended, as shown on a scene card.
    pub fn user_message(&self) -> String {
        match &self.suggestion {
            Some(suggestion) => format!("{} - {}", self.error, suggestion),
            None => self.error.clone(),
        }
    }
}

/// Outcome of one remote stage call.
pub type StageResult<T> = std::result::Result<T, StageFailure>;

/// Unified error type covering every failure the client reports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wizard field is missing or invalid. Never reaches the network.
    #[error("Validation error [{field}]: {message}")]
    Validation {
        /// The brief field that failed (e.g. "title").
        field: String,
        /// Message to show next to the field.
        message: String,
    },

    /// A stage-level remote call failed; the run is parked at that stage.
    #[error("{stage} generation failed: {failure}")]
    Stage {
        stage: StageKind,
        #[source]
        failure: StageFailure,
    },

    /// The operation is not legal at the run's current stage.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A scene index supplied by a caller does not exist in the run.
    #[error("Scene index {index} out of range (run has {len} scenes)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Every scene image failed, so there is nothing to compose.
    #[error("No successful scene images to compose into a video")]
    NoArtifacts,
}

impl Error {
    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Stage`].
    pub fn stage(stage: StageKind, failure: StageFailure) -> Self {
        Error::Stage { stage, failure }
    }

    /// The underlying remote failure, if this error came from a stage call.
    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            Error::Stage { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// The service's suggestion, if it sent one.
    pub fn suggestion(&self) -> Option<&str> {
        self.failure().and_then(|f| f.suggestion.as_deref())
    }

    /// Whether repeating the same user action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Stage { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
