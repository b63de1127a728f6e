//! Client for the remote coordinator service.
//!
//! The coordinator ingests a document into a session and answers questions
//! about it. This crate performs exactly those two calls and hands back
//! parsed results or a [`TransportError`]; it never retries.

pub mod error;
pub mod http;
pub mod scripted;
pub mod wire;

use async_trait::async_trait;

use docent_core::types::{DocumentRef, Message};

pub use error::TransportError;
pub use http::HttpCoordinatorClient;
pub use scripted::{RecordedQuery, ScriptedCoordinator};

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub session_id: String,
    pub chunks_processed: u64,
    pub trace_id: Option<String>,
}

/// Result of a successful query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryReply {
    /// The coordinator's answer, if it produced one.
    pub answer: Option<String>,
    /// Supporting passages in the order the coordinator ranked them.
    pub source_context: Vec<String>,
    pub trace_id: Option<String>,
}

/// The two request shapes the session orchestrator needs.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    /// Upload a document and open a session for it.
    async fn ingest(&self, document: &DocumentRef) -> Result<IngestReceipt, TransportError>;

    /// Ask `question` within `session_id`.
    ///
    /// `history` holds the prior turns only; the question itself is sent
    /// separately.
    async fn query(
        &self,
        session_id: &str,
        question: &str,
        history: &[Message],
    ) -> Result<QueryReply, TransportError>;
}
