//! Read-only snapshot of a session for presentation collaborators.

use serde::Serialize;

use docent_core::types::Message;

use crate::state::{SessionStatus, UploadStatus};

/// Everything a collaborator may display, copied out of the orchestrator.
///
/// Built fresh on each call to `current_view`; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub document_name: Option<String>,
    pub document_size: Option<u64>,
    pub session_id: Option<String>,
    pub chunks_processed: Option<u64>,
    pub messages: Vec<Message>,
}

impl SessionView {
    /// Coarse status for upload indicators.
    pub fn upload_status(&self) -> UploadStatus {
        UploadStatus::from(self.status)
    }

    /// Whether an answer is being waited on.
    pub fn is_awaiting_answer(&self) -> bool {
        self.status == SessionStatus::Querying
    }

    /// Whether `send_message` would currently be accepted.
    pub fn accepts_messages(&self) -> bool {
        self.status == SessionStatus::Ready
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
