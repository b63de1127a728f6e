//! Session status machine.
//!
//! Valid transitions:
//! - any -> Uploading (a document is submitted, superseding whatever was there)
//! - Uploading -> Ready (ingestion succeeded)
//! - Uploading -> Error (ingestion failed)
//! - Ready -> Querying (a question was sent)
//! - Querying -> Ready (answer received)
//! - Querying -> Error (query failed)
//! - Error -> Ready (explicit resume after a failed query)
//!
//! Clearing the session is a reset to Idle from any state, not a transition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Lifecycle state of the document session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No document selected.
    #[default]
    Idle,
    /// The document is being ingested by the coordinator.
    Uploading,
    /// A session exists and accepts questions.
    Ready,
    /// A question is in flight.
    Querying,
    /// The last ingestion or query failed.
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Uploading => write!(f, "uploading"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::Querying => write!(f, "querying"),
            SessionStatus::Error => write!(f, "error"),
        }
    }
}

impl SessionStatus {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        matches!(
            (self, target),
            (_, SessionStatus::Uploading)
                | (SessionStatus::Uploading, SessionStatus::Ready)
                | (SessionStatus::Uploading, SessionStatus::Error)
                | (SessionStatus::Ready, SessionStatus::Querying)
                | (SessionStatus::Querying, SessionStatus::Ready)
                | (SessionStatus::Querying, SessionStatus::Error)
                | (SessionStatus::Error, SessionStatus::Ready)
        )
    }
}

/// Coarse status for upload and readiness indicators.
///
/// A question in flight reads as `Uploading`: the panel only shows that the
/// coordinator is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Ready,
    Error,
}

impl From<SessionStatus> for UploadStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Idle => UploadStatus::Idle,
            SessionStatus::Uploading | SessionStatus::Querying => UploadStatus::Uploading,
            SessionStatus::Ready => UploadStatus::Ready,
            SessionStatus::Error => UploadStatus::Error,
        }
    }
}

impl UploadStatus {
    /// Human-readable status text.
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "Ready",
            UploadStatus::Uploading => "Processing...",
            UploadStatus::Ready => "Processing Complete",
            UploadStatus::Error => "Processing Failed",
        }
    }
}

/// Validated holder of the current [`SessionStatus`].
///
/// Not synchronized on its own; the orchestrator keeps it behind the same
/// lock as the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    status: SessionStatus,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SessionStatus {
        self.status
    }

    /// Move to `target`, returning the previous status.
    pub fn transition(&mut self, target: SessionStatus) -> Result<SessionStatus, SessionError> {
        let from = self.status;
        if from.can_transition_to(&target) {
            tracing::debug!("Session status: {} -> {}", from, target);
            self.status = target;
            Ok(from)
        } else {
            Err(SessionError::InvalidTransition { from, to: target })
        }
    }

    /// Force the lifecycle back to Idle, returning the previous status.
    pub fn reset(&mut self) -> SessionStatus {
        let from = self.status;
        tracing::debug!("Session status reset to idle from {}", from);
        self.status = SessionStatus::Idle;
        from
    }
}
