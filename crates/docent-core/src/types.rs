use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocentError, Result};

// =============================================================================
// Messages
// =============================================================================

/// Who authored a message in the conversation log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person asking questions about the document.
    User,
    /// The coordinator's answers, and locally synthesized failure notices.
    Agent,
}

impl Role {
    /// Role name the coordinator expects in `chat_history` entries.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

/// Opaque, unique identifier of a message within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A passage of the active document cited by an agent answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name of the document the passage was attributed to.
    pub document_label: String,
    /// 1-based position of the passage in the coordinator's response.
    ///
    /// This is an approximation assigned locally from response order. It is
    /// not a page number and carries no guarantee about where in the
    /// document the passage appears.
    pub ordinal: u32,
    /// The cited text.
    pub snippet: String,
}

/// One entry of the conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Evidence cited by an agent answer. Never set on user messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl Message {
    /// A question typed by the user, stamped with the current time.
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            sources: None,
        }
    }

    /// An agent-authored message, stamped with the current time.
    pub fn agent(id: MessageId, content: impl Into<String>, sources: Option<Vec<Source>>) -> Self {
        Self {
            id,
            role: Role::Agent,
            content: content.into(),
            timestamp: Utc::now(),
            sources,
        }
    }

    /// Cited sources, or an empty slice.
    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or(&[])
    }
}

// =============================================================================
// ConversationLog
// =============================================================================

/// Ordered, append-only record of a session's conversation.
///
/// The only way to remove entries is [`ConversationLog::clear`], which drops
/// the whole history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

// =============================================================================
// DocumentRef
// =============================================================================

/// Handle to an uploaded document: its display name, raw bytes and MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentRef {
    name: String,
    content: Vec<u8>,
    content_type: Option<String>,
}

impl fmt::Debug for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRef")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl DocumentRef {
    /// Wrap in-memory bytes. The MIME type is guessed from the name's extension.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_raw()
            .map(str::to_string);
        Self {
            name,
            content,
            content_type,
        }
    }

    /// Override the guessed MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a document from disk, naming it after the file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DocentError::Document(format!("path has no file name: {}", path.display()))
            })?
            .to_string();
        let content = std::fs::read(path)?;
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size of the document in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
