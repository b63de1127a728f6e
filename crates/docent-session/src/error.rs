//! Errors returned when the orchestrator rejects a command.

use docent_core::error::DocentError;

use crate::state::SessionStatus;

/// A command was refused. The session is left exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("session is not ready for questions (status: {0})")]
    NotReady(SessionStatus),
    #[error("no active session")]
    NoSession,
    #[error("cannot resume from {0}: no session to return to")]
    NotRecoverable(SessionStatus),
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
}

impl From<SessionError> for DocentError {
    fn from(err: SessionError) -> Self {
        DocentError::Session(err.to_string())
    }
}
