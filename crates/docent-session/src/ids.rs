//! Message id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use docent_core::types::MessageId;

/// What a message id is being minted for. Only affects the id's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Agent,
    /// Locally synthesized notice that a query failed.
    Failure,
}

impl MessageKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Agent => "agent",
            MessageKind::Failure => "error",
        }
    }
}

/// Source of message ids. Ids must never repeat within one orchestrator.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, kind: MessageKind) -> MessageId;
}

/// Monotonic counter ids: `user_1`, `agent_2`, `error_3`, ...
///
/// The counter is shared across kinds and never resets, so ids stay unique
/// even across document changes.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, kind: MessageKind) -> MessageId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        MessageId::new(format!("{}_{}", kind.prefix(), n))
    }
}

/// Random v4 UUID ids, prefixed by kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self, kind: MessageKind) -> MessageId {
        MessageId::new(format!("{}_{}", kind.prefix(), Uuid::new_v4()))
    }
}
