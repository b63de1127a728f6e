//! Transport errors from the coordinator client.

use docent_core::error::DocentError;

/// Any way a coordinator call can fail.
///
/// Callers treat every variant the same; the distinction exists for logs.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    InvalidRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("coordinator returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Payload(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Payload(err.to_string())
    }
}

impl From<TransportError> for DocentError {
    fn from(err: TransportError) -> Self {
        DocentError::Transport(err.to_string())
    }
}
