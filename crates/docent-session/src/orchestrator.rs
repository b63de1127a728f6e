//! Session orchestrator: sole owner of the document session and its
//! conversation.
//!
//! Commands (`submit_document`, `send_message`, `clear_document`, `resume`)
//! mutate state synchronously under one lock, release it across the single
//! network call they make, then re-acquire it to apply the result. Every
//! `submit_document` and `clear_document` advances an epoch; a response that
//! completes under an older epoch is discarded, so the latest submission
//! always wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use docent_client::CoordinatorClient;
use docent_core::types::{ConversationLog, DocumentRef, Message, Source};

use crate::error::SessionError;
use crate::events::{CallKind, SessionEvent};
use crate::ids::{IdGenerator, MessageKind, SequentialIds};
use crate::state::{Lifecycle, SessionStatus};
use crate::view::SessionView;

/// Answer text used when the coordinator replies without one.
pub const FALLBACK_ANSWER: &str = "No answer received.";

/// Agent reply appended when a query fails.
pub const FAILURE_NOTICE: &str = "Sorry, the query failed. Please try again.";

const EVENT_CAPACITY: usize = 64;

/// How a `submit_document` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The session is ready for questions.
    Ready {
        session_id: String,
        chunks_processed: u64,
    },
    /// Ingestion failed; the session is in `Error` with no session id.
    Failed,
    /// A later submit or clear replaced this document before the response
    /// arrived. Nothing was changed.
    Superseded,
}

/// How an accepted `send_message` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The agent's answer, as appended to the log.
    Answered(Message),
    /// The failure notice, as appended to the log.
    Failed(Message),
    /// The session was replaced or cleared while the query was in flight.
    Superseded,
}

#[derive(Debug, Default)]
struct SessionState {
    lifecycle: Lifecycle,
    epoch: u64,
    document: Option<Arc<DocumentRef>>,
    session_id: Option<String>,
    chunks_processed: Option<u64>,
    log: ConversationLog,
}

impl SessionState {
    fn discard_session(&mut self) {
        self.session_id = None;
        self.chunks_processed = None;
        self.log.clear();
    }
}

/// Drives one document session against a coordinator.
pub struct SessionOrchestrator {
    client: Arc<dyn CoordinatorClient>,
    ids: Box<dyn IdGenerator>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("state", &self.state)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionOrchestrator {
    /// Create an idle orchestrator using sequential message ids.
    pub fn new(client: Arc<dyn CoordinatorClient>) -> Self {
        Self::with_id_generator(client, Box::new(SequentialIds::new()))
    }

    pub fn with_id_generator(
        client: Arc<dyn CoordinatorClient>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            ids,
            state: Mutex::new(SessionState::default()),
            events,
        }
    }

    /// Receive an event for every subsequent state change.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().lifecycle.current()
    }

    /// Snapshot of everything collaborators may display.
    pub fn current_view(&self) -> SessionView {
        let state = self.lock();
        SessionView {
            status: state.lifecycle.current(),
            document_name: state.document.as_ref().map(|d| d.name().to_string()),
            document_size: state.document.as_ref().map(|d| d.size()),
            session_id: state.session_id.clone(),
            chunks_processed: state.chunks_processed,
            messages: state.log.as_slice().to_vec(),
        }
    }

    /// Replace the session with `document` and ingest it.
    ///
    /// Accepted in every state. Clears the conversation and session fields
    /// before the upload starts.
    pub async fn submit_document(
        &self,
        document: DocumentRef,
    ) -> Result<IngestOutcome, SessionError> {
        let document = Arc::new(document);
        let epoch = {
            let mut state = self.lock();
            state.epoch += 1;
            state.discard_session();
            state.document = Some(Arc::clone(&document));
            self.emit(SessionEvent::DocumentSubmitted {
                document_name: document.name().to_string(),
                size: document.size(),
            });
            self.move_to(&mut state, SessionStatus::Uploading)?;
            state.epoch
        };

        tracing::info!(
            document = %document.name(),
            size = document.size(),
            "Submitting document for ingestion"
        );
        let result = self.client.ingest(&document).await;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(document = %document.name(), "Discarding stale ingestion response");
            self.emit(SessionEvent::ResponseDiscarded {
                call: CallKind::Ingest,
            });
            return Ok(IngestOutcome::Superseded);
        }

        match result {
            Ok(receipt) => {
                tracing::info!(
                    session_id = %receipt.session_id,
                    chunks_processed = receipt.chunks_processed,
                    trace_id = receipt.trace_id.as_deref().unwrap_or("-"),
                    "Document ingested"
                );
                state.session_id = Some(receipt.session_id.clone());
                state.chunks_processed = Some(receipt.chunks_processed);
                self.move_to(&mut state, SessionStatus::Ready)?;
                self.emit(SessionEvent::IngestionCompleted {
                    session_id: receipt.session_id.clone(),
                    chunks_processed: receipt.chunks_processed,
                });
                Ok(IngestOutcome::Ready {
                    session_id: receipt.session_id,
                    chunks_processed: receipt.chunks_processed,
                })
            }
            Err(e) => {
                tracing::warn!(document = %document.name(), error = %e, "Ingestion failed");
                self.move_to(&mut state, SessionStatus::Error)?;
                self.emit(SessionEvent::IngestionFailed {
                    reason: e.to_string(),
                });
                Ok(IngestOutcome::Failed)
            }
        }
    }

    /// Ask a question about the current document.
    ///
    /// Only accepted while `Ready`; otherwise rejected with no effect. The
    /// user's message is appended before the query is sent and is kept
    /// whatever the outcome.
    pub async fn send_message(&self, text: &str) -> Result<QueryOutcome, SessionError> {
        let question = text.trim();

        let (epoch, session_id, document_label, history) = {
            let mut state = self.lock();
            let status = state.lifecycle.current();
            if question.is_empty() {
                tracing::debug!("Rejected empty message");
                return Err(SessionError::EmptyMessage);
            }
            if status != SessionStatus::Ready {
                tracing::debug!(%status, "Rejected message: session not ready");
                return Err(SessionError::NotReady(status));
            }
            let (Some(session_id), Some(document)) =
                (state.session_id.clone(), state.document.clone())
            else {
                tracing::debug!("Rejected message: no active session");
                return Err(SessionError::NoSession);
            };

            // The coordinator gets the turns before this question as history.
            let history = state.log.as_slice().to_vec();

            let message = Message::user(self.ids.next_id(MessageKind::User), question);
            self.append(&mut state, message);
            self.move_to(&mut state, SessionStatus::Querying)?;
            (
                state.epoch,
                session_id,
                document.name().to_string(),
                history,
            )
        };

        let result = self.client.query(&session_id, question, &history).await;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(session_id = %session_id, "Discarding stale query response");
            self.emit(SessionEvent::ResponseDiscarded {
                call: CallKind::Query,
            });
            return Ok(QueryOutcome::Superseded);
        }

        match result {
            Ok(reply) => {
                let sources = number_sources(&document_label, reply.source_context);
                let source_count = sources.len();
                let answer = reply
                    .answer
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| FALLBACK_ANSWER.to_string());

                tracing::info!(
                    session_id = %session_id,
                    source_count,
                    trace_id = reply.trace_id.as_deref().unwrap_or("-"),
                    "Query answered"
                );

                let message = Message::agent(
                    self.ids.next_id(MessageKind::Agent),
                    answer,
                    (!sources.is_empty()).then_some(sources),
                );
                self.append(&mut state, message.clone());
                self.move_to(&mut state, SessionStatus::Ready)?;
                self.emit(SessionEvent::QueryCompleted {
                    session_id,
                    source_count,
                });
                Ok(QueryOutcome::Answered(message))
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Query failed");
                let message =
                    Message::agent(self.ids.next_id(MessageKind::Failure), FAILURE_NOTICE, None);
                self.append(&mut state, message.clone());
                self.move_to(&mut state, SessionStatus::Error)?;
                self.emit(SessionEvent::QueryFailed {
                    reason: e.to_string(),
                });
                Ok(QueryOutcome::Failed(message))
            }
        }
    }

    /// Drop the document, session and conversation, returning to `Idle`.
    ///
    /// Any response still in flight is discarded when it arrives.
    pub fn clear_document(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        state.discard_session();
        state.document = None;
        let from = state.lifecycle.reset();
        if from != SessionStatus::Idle {
            self.emit(SessionEvent::StatusChanged {
                from,
                to: SessionStatus::Idle,
            });
        }
        self.emit(SessionEvent::SessionCleared);
        tracing::info!("Session cleared");
    }

    /// Return from `Error` to `Ready` after a failed query.
    ///
    /// Rejected unless the session is in `Error` and still has a session id;
    /// a failed ingestion can only be recovered by submitting a document.
    pub fn resume(&self) -> Result<(), SessionError> {
        let mut state = self.lock();
        let status = state.lifecycle.current();
        if status != SessionStatus::Error || state.session_id.is_none() {
            tracing::debug!(%status, "Rejected resume: nothing to recover");
            return Err(SessionError::NotRecoverable(status));
        }
        self.move_to(&mut state, SessionStatus::Ready)?;
        tracing::info!("Session resumed after failed query");
        Ok(())
    }

    // Nothing panics while the lock is held, so a poisoned guard still
    // holds consistent state.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn move_to(&self, state: &mut SessionState, target: SessionStatus) -> Result<(), SessionError> {
        let from = state.lifecycle.transition(target)?;
        self.emit(SessionEvent::StatusChanged { from, to: target });
        Ok(())
    }

    fn append(&self, state: &mut SessionState, message: Message) {
        self.emit(SessionEvent::MessageAppended {
            message_id: message.id.clone(),
            role: message.role,
        });
        state.log.push(message);
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Attribute each passage to the document, numbered from 1 in response order.
fn number_sources(document_label: &str, source_context: Vec<String>) -> Vec<Source> {
    source_context
        .into_iter()
        .zip(1u32..)
        .map(|(snippet, ordinal)| Source {
            document_label: document_label.to_string(),
            ordinal,
            snippet,
        })
        .collect()
}
