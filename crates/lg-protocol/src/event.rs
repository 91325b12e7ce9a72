//! Chat stream events and the chat request body.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat/stream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.into(),
        }
    }
}

/// Events emitted by the concierge backend on the chat stream.
///
/// On the wire each event is `{"type": "<tag>", "data": {...}}`. Unknown
/// tags fail to deserialize so the stream consumer can skip them like any
/// other malformed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEvent", into = "WireEvent")]
pub enum ChatEvent {
    /// Another agent takes over the conversation.
    AgentTransfer {
        agent: Option<String>,
        message: String,
    },

    /// A chunk of text from the current agent.
    Content { text: String },

    /// The turn is complete.
    Done,

    /// The backend failed while producing the turn.
    Error {
        message: String,
        detail: Option<String>,
    },
}

impl ChatEvent {
    pub fn content(text: impl Into<String>) -> Self {
        Self::Content { text: text.into() }
    }

    pub fn transfer(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AgentTransfer {
            agent: Some(agent.into()),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            detail: None,
        }
    }

    /// Wire tag of this event.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::AgentTransfer { .. } => "agent_transfer",
            Self::Content { .. } => "content",
            Self::Done => "done",
            Self::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: WireData,
}

impl TryFrom<WireEvent> for ChatEvent {
    type Error = String;

    fn try_from(wire: WireEvent) -> Result<Self, String> {
        let data = wire.data;
        match wire.kind.as_str() {
            "agent_transfer" => Ok(ChatEvent::AgentTransfer {
                agent: data.agent,
                message: data.message.unwrap_or_default(),
            }),
            "content" => Ok(ChatEvent::Content {
                text: data.text.unwrap_or_default(),
            }),
            "done" => Ok(ChatEvent::Done),
            "error" => Ok(ChatEvent::Error {
                message: data
                    .message
                    .or_else(|| data.detail.clone())
                    .unwrap_or_else(|| "unknown error".to_string()),
                detail: data.detail,
            }),
            other => Err(format!("unknown chat event type '{other}'")),
        }
    }
}

impl From<ChatEvent> for WireEvent {
    fn from(event: ChatEvent) -> Self {
        let kind = event.tag().to_string();
        let data = match event {
            ChatEvent::AgentTransfer { agent, message } => WireData {
                agent,
                message: Some(message),
                ..Default::default()
            },
            ChatEvent::Content { text } => WireData {
                text: Some(text),
                ..Default::default()
            },
            ChatEvent::Done => WireData::default(),
            ChatEvent::Error { message, detail } => WireData {
                message: Some(message),
                detail,
                ..Default::default()
            },
        };
        WireEvent { kind, data }
    }
}
