//! Session events published to collaborators.
//!
//! Events announce that something changed; subscribers re-read
//! `SessionOrchestrator::current_view` for the new state.

use serde::{Deserialize, Serialize};

use docent_core::types::{MessageId, Role};

use crate::state::SessionStatus;

/// Which network call a discarded response belonged to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Ingest,
    Query,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new document replaced the session and ingestion started.
    DocumentSubmitted { document_name: String, size: u64 },

    /// The coordinator opened a session for the document.
    IngestionCompleted {
        session_id: String,
        chunks_processed: u64,
    },

    IngestionFailed { reason: String },

    /// A message was appended to the conversation log.
    MessageAppended { message_id: MessageId, role: Role },

    QueryCompleted {
        session_id: String,
        source_count: usize,
    },

    QueryFailed { reason: String },

    StatusChanged {
        from: SessionStatus,
        to: SessionStatus,
    },

    /// Document, session and conversation were discarded.
    SessionCleared,

    /// A response arrived for a session that has since been replaced or
    /// cleared, and was ignored.
    ResponseDiscarded { call: CallKind },
}
