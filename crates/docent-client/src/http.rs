//! HTTP implementation of [`CoordinatorClient`] backed by `reqwest`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use docent_core::config::CoordinatorConfig;
use docent_core::types::{DocumentRef, Message};

use crate::error::TransportError;
use crate::wire::{IngestEnvelope, QueryBody, QueryReplyBody};
use crate::{CoordinatorClient, IngestReceipt, QueryReply};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Talks to the coordinator over HTTP.
///
/// Uses the transport's default timeouts and makes one attempt per call.
#[derive(Debug, Clone)]
pub struct HttpCoordinatorClient {
    http: reqwest::Client,
    config: CoordinatorConfig,
}

impl HttpCoordinatorClient {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing `reqwest` client (connection pool, TLS settings).
    pub fn with_client(http: reqwest::Client, config: CoordinatorConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }
}

#[async_trait]
impl CoordinatorClient for HttpCoordinatorClient {
    async fn ingest(&self, document: &DocumentRef) -> Result<IngestReceipt, TransportError> {
        let url = self.config.ingest_url();
        let part = reqwest::multipart::Part::bytes(document.content().to_vec())
            .file_name(document.name().to_string())
            .mime_str(document.content_type().unwrap_or(DEFAULT_CONTENT_TYPE))
            .map_err(|e| TransportError::InvalidRequest(format!("bad content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part(self.config.file_field.clone(), part);

        tracing::debug!(
            url = %url,
            document = %document.name(),
            size = document.size(),
            "Uploading document to coordinator"
        );

        let response = self.http.post(&url).multipart(form).send().await?;
        let envelope: IngestEnvelope = read_json(response).await?;

        Ok(IngestReceipt {
            session_id: envelope.payload.session_id,
            chunks_processed: envelope.payload.chunks_processed,
            trace_id: envelope.trace_id,
        })
    }

    async fn query(
        &self,
        session_id: &str,
        question: &str,
        history: &[Message],
    ) -> Result<QueryReply, TransportError> {
        let url = self.config.query_url();
        let body = QueryBody::new(session_id, question, history);

        tracing::debug!(
            url = %url,
            session_id = %session_id,
            history_len = body.chat_history.len(),
            "Sending query to coordinator"
        );

        let response = self.http.post(&url).json(&body).send().await?;
        let reply: QueryReplyBody = read_json(response).await?;

        Ok(QueryReply {
            answer: reply.answer,
            source_context: reply.source_context.unwrap_or_default(),
            trace_id: reply.trace_id,
        })
    }
}

/// Reject non-2xx responses, then decode the body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
