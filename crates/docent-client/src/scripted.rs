//! In-memory coordinator that replays scripted responses.
//!
//! Used in place of the network when exercising the session orchestrator.
//! Each scripted response may be held behind a [`Notify`] gate so callers can
//! observe in-flight state or complete calls out of order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use docent_core::types::{DocumentRef, Message};

use crate::error::TransportError;
use crate::wire::ChatTurn;
use crate::{CoordinatorClient, IngestReceipt, QueryReply};

struct Scripted<T> {
    result: Result<T, TransportError>,
    gate: Option<Arc<Notify>>,
}

/// A query as the coordinator would have received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub session_id: String,
    pub question: String,
    pub history: Vec<ChatTurn>,
}

/// Coordinator double that answers calls from two FIFO scripts.
///
/// A call with nothing scripted fails with a network error.
#[derive(Default)]
pub struct ScriptedCoordinator {
    ingests: Mutex<VecDeque<Scripted<IngestReceipt>>>,
    queries: Mutex<VecDeque<Scripted<QueryReply>>>,
    ingested: Mutex<Vec<String>>,
    asked: Mutex<Vec<RecordedQuery>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next `ingest` call.
    pub fn push_ingest(&self, result: Result<IngestReceipt, TransportError>) {
        lock(&self.ingests).push_back(Scripted { result, gate: None });
    }

    /// Queue an `ingest` outcome that is only delivered once the returned
    /// gate is notified.
    pub fn push_ingest_gated(&self, result: Result<IngestReceipt, TransportError>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.ingests).push_back(Scripted {
            result,
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    /// Queue the outcome of the next `query` call.
    pub fn push_query(&self, result: Result<QueryReply, TransportError>) {
        lock(&self.queries).push_back(Scripted { result, gate: None });
    }

    /// Queue a `query` outcome held behind a gate.
    pub fn push_query_gated(&self, result: Result<QueryReply, TransportError>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.queries).push_back(Scripted {
            result,
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    /// Shorthand for a successful ingestion.
    pub fn ingest_ok(&self, session_id: &str, chunks_processed: u64) {
        self.push_ingest(Ok(IngestReceipt {
            session_id: session_id.to_string(),
            chunks_processed,
            trace_id: None,
        }));
    }

    /// Shorthand for a successful answer.
    pub fn answer(&self, answer: &str, source_context: &[&str]) {
        self.push_query(Ok(QueryReply {
            answer: Some(answer.to_string()),
            source_context: source_context.iter().map(|s| s.to_string()).collect(),
            trace_id: None,
        }));
    }

    /// Names of the documents ingested so far, in call order.
    pub fn ingested(&self) -> Vec<String> {
        lock(&self.ingested).clone()
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<RecordedQuery> {
        lock(&self.asked).clone()
    }
}

async fn deliver<T>(next: Option<Scripted<T>>, call: &str) -> Result<T, TransportError> {
    let Some(scripted) = next else {
        return Err(TransportError::Network(format!("no scripted {call} response")));
    };
    if let Some(gate) = scripted.gate {
        gate.notified().await;
    }
    scripted.result
}

#[async_trait]
impl CoordinatorClient for ScriptedCoordinator {
    async fn ingest(&self, document: &DocumentRef) -> Result<IngestReceipt, TransportError> {
        lock(&self.ingested).push(document.name().to_string());
        let next = lock(&self.ingests).pop_front();
        deliver(next, "ingest").await
    }

    async fn query(
        &self,
        session_id: &str,
        question: &str,
        history: &[Message],
    ) -> Result<QueryReply, TransportError> {
        lock(&self.asked).push(RecordedQuery {
            session_id: session_id.to_string(),
            question: question.to_string(),
            history: history.iter().map(ChatTurn::from).collect(),
        });
        let next = lock(&self.queries).pop_front();
        deliver(next, "query").await
    }
}
