//! Assistant Session
//!
//! Conversation state for the math assistant. The session only tracks
//! messages and whether a request is in flight; the actual solving is done
//! by the [`Solver`](crate::backend::Solver) outside this module.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──submit──► AwaitingResponse ──receive──► Idle
//! ```
//!
//! A submission while awaiting a response is rejected. There is no queue
//! and no cancellation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Greeting that seeds every new session
pub const DEFAULT_GREETING: &str = "Hi! I'm Aura AI. I can solve word problems, explain calculus, \
or help with unit conversions. What's on your mind?";

/// Unique message identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("msg_{id}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who authored a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The person using the calculator
    User,
    /// The math assistant
    Assistant,
}

/// A message in the assistant conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Message content
    pub content: String,
}

impl AssistantMessage {
    /// Create a new message
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
        }
    }
}

/// Session state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Ready for a new question
    #[default]
    Idle,
    /// A question has been sent and its answer has not arrived yet
    AwaitingResponse,
}

/// Reasons a submission is refused
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// A request is already in flight
    #[error("the assistant is still answering the previous question")]
    Busy,
    /// Text was empty after trimming
    #[error("cannot send an empty message")]
    EmptyInput,
}

/// Conversation with the math assistant
#[derive(Clone, Debug)]
pub struct AssistantSession {
    messages: Vec<AssistantMessage>,
    state: SessionState,
}

impl Default for AssistantSession {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

impl AssistantSession {
    /// Create a session seeded with an assistant greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![AssistantMessage::new(MessageRole::Assistant, greeting)],
            state: SessionState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a request is in flight
    pub fn is_pending(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    /// All messages in chronological order
    pub fn messages(&self) -> &[AssistantMessage] {
        &self.messages
    }

    /// Most recent message
    pub fn last_message(&self) -> Option<&AssistantMessage> {
        self.messages.last()
    }

    /// Accept a user question
    ///
    /// Returns the trimmed query that must be sent to the solver. On error
    /// the session is left untouched.
    pub fn submit(&mut self, text: &str) -> Result<String, SubmitError> {
        if self.is_pending() {
            return Err(SubmitError::Busy);
        }

        let query = text.trim();
        if query.is_empty() {
            return Err(SubmitError::EmptyInput);
        }

        self.messages.push(AssistantMessage::new(MessageRole::User, query));
        self.state = SessionState::AwaitingResponse;
        Ok(query.to_string())
    }

    /// Deliver the answer to the in-flight question
    ///
    /// Returns `false` if no question was pending, in which case the reply
    /// is dropped.
    pub fn receive(&mut self, content: impl Into<String>) -> bool {
        if !self.is_pending() {
            tracing::warn!("Dropping assistant reply with no pending request");
            return false;
        }

        self.messages.push(AssistantMessage::new(MessageRole::Assistant, content));
        self.state = SessionState::Idle;
        true
    }
}
