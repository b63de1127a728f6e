//! Request and response bodies exchanged with the coordinator.
//!
//! Field names match the coordinator's HTTP contract exactly.

use serde::{Deserialize, Serialize};

use docent_core::types::Message;

/// Body of a successful ingestion response.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestEnvelope {
    pub payload: IngestPayload,
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestPayload {
    pub session_id: String,
    pub chunks_processed: u64,
}

/// One prior turn of the conversation, as the coordinator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.wire_name().to_string(),
            content: message.content.clone(),
        }
    }
}

/// JSON body of a query request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBody {
    pub session_id: String,
    pub user_query: String,
    pub chat_history: Vec<ChatTurn>,
}

impl QueryBody {
    pub fn new(session_id: &str, question: &str, history: &[Message]) -> Self {
        Self {
            session_id: session_id.to_string(),
            user_query: question.to_string(),
            chat_history: history.iter().map(ChatTurn::from).collect(),
        }
    }
}

/// Body of a successful query response. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryReplyBody {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub source_context: Option<Vec<String>>,
    #[serde(default)]
    pub trace_id: Option<String>,
}
