//! Display messages shown in the chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Agent,
    Transfer,
}

/// A message in the chat transcript.
///
/// Agent messages grow in place while their agent keeps streaming; once the
/// reducer allocates a new message id the previous message is never touched
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub kind: MessageKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            kind: MessageKind::User,
            content: content.into(),
            agent: None,
            timestamp: at,
        }
    }

    pub fn agent(
        id: impl Into<String>,
        agent: Option<String>,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: MessageKind::Agent,
            content: content.into(),
            agent,
            timestamp: at,
        }
    }

    pub fn transfer(
        id: impl Into<String>,
        agent: Option<String>,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: MessageKind::Transfer,
            content: content.into(),
            agent,
            timestamp: at,
        }
    }

    /// Sender label shown above the message body.
    pub fn sender_label(&self) -> &str {
        match self.kind {
            MessageKind::User => "You",
            MessageKind::Transfer => "🔄 Transfer",
            MessageKind::Agent => self.agent.as_deref().unwrap_or("Agent"),
        }
    }
}
