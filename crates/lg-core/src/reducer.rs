//! Folds chat events into the ordered transcript.
//!
//! The reducer owns message-id allocation. Ids come from a counter held in
//! the state, so replaying the same event history from the same starting
//! state always yields the same transcript.

use chrono::{DateTime, Utc};
use lg_protocol::{ChatEvent, Message};

pub const GREETING_ID: &str = "initial_sam_message";
pub const TRANSPORT_FAILURE_TEXT: &str = "Sorry, there was an error processing your request.";
const FALLBACK_AGENT: &str = "Agent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    pub messages: Vec<Message>,
    /// Agent that content events are attributed to.
    pub current_agent: String,
    /// True from user submit until `done`, `error` or a transport failure.
    pub loading: bool,
    /// Id of the agent message that `content` events append to.
    current_message_id: String,
    next_id: u64,
}

impl ChatState {
    pub fn new(initial_agent: impl Into<String>) -> Self {
        let mut state = Self {
            messages: Vec::new(),
            current_agent: initial_agent.into(),
            loading: false,
            current_message_id: String::new(),
            next_id: 0,
        };
        state.current_message_id = state.allocate_id("agent");
        state
    }

    /// Start with an opening message from the initial agent.
    pub fn with_greeting(
        initial_agent: impl Into<String>,
        greeting: &str,
        at: DateTime<Utc>,
    ) -> Self {
        let mut state = Self::new(initial_agent);
        if !greeting.is_empty() {
            let agent = Some(state.current_agent.clone());
            state
                .messages
                .push(Message::agent(GREETING_ID, agent, greeting, at));
        }
        state
    }

    fn allocate_id(&mut self, suffix: &str) -> String {
        self.next_id += 1;
        format!("m{}_{suffix}", self.next_id)
    }

    pub fn current_message_id(&self) -> &str {
        &self.current_message_id
    }

    /// The agent message currently being streamed into, if it exists yet.
    pub fn current_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.id == self.current_message_id)
    }

    /// Record a user message and open a new turn.
    pub fn submit_user(&mut self, text: &str, at: DateTime<Utc>) {
        let id = self.allocate_id("user");
        self.messages.push(Message::user(id, text, at));
        self.loading = true;
        self.current_message_id = self.allocate_id("agent");
    }

    /// Apply one backend event.
    pub fn apply(&mut self, event: &ChatEvent, at: DateTime<Utc>) {
        match event {
            ChatEvent::AgentTransfer { agent, message } => {
                let id = self.allocate_id("transfer");
                self.messages
                    .push(Message::transfer(id, agent.clone(), message.as_str(), at));
                self.current_agent = agent
                    .clone()
                    .unwrap_or_else(|| FALLBACK_AGENT.to_string());
                self.current_message_id = self.allocate_id("agent");
            }
            ChatEvent::Content { text } => {
                let current = self.current_message_id.as_str();
                match self.messages.iter_mut().rev().find(|m| m.id == current) {
                    Some(message) => message.content.push_str(text),
                    None => {
                        let agent = Some(self.current_agent.clone());
                        let message = Message::agent(current, agent, text.as_str(), at);
                        self.messages.push(message);
                    }
                }
            }
            ChatEvent::Done => {
                self.loading = false;
            }
            ChatEvent::Error { message, .. } => {
                let id = self.allocate_id("error");
                self.messages
                    .push(Message::agent(id, None, format!("Error: {message}"), at));
                self.loading = false;
            }
        }
    }

    /// Record a transport failure for the running turn.
    pub fn fail_turn(&mut self, at: DateTime<Utc>) {
        let id = self.allocate_id("error");
        self.messages
            .push(Message::agent(id, None, TRANSPORT_FAILURE_TEXT, at));
        self.loading = false;
    }
}

/// Pure form of [`ChatState::apply`].
pub fn reduce(mut state: ChatState, event: &ChatEvent, at: DateTime<Utc>) -> ChatState {
    state.apply(event, at);
    state
}

/// Fold a whole event history onto a starting state.
pub fn replay(initial: &ChatState, events: &[ChatEvent], at: DateTime<Utc>) -> ChatState {
    events
        .iter()
        .fold(initial.clone(), |state, event| reduce(state, event, at))
}
