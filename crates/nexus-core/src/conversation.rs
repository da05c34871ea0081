//! Conversation state
//!
//! Append-only ordered log of exchanged messages. Messages are never
//! mutated once appended; ordering is append order. The most recent
//! structured response doubles as the side-panel analysis.

use crate::attachment::Attachment;
use crate::response::StructuredResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human
    User,
    /// The assistant
    Assistant,
}

/// One exchanged message
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Unique message id
    pub id: Uuid,
    /// Author role
    pub role: Role,
    /// Text shown in the transcript
    pub display_text: String,
    /// Media the user attached, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Structured response carried by assistant messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredResponse>,
    /// Append timestamp
    pub created_at: DateTime<Utc>,
}

/// Append-only conversation log
#[derive(Debug, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message, returning its id
    pub fn push_user(
        &mut self,
        display_text: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Uuid {
        let message = Message {
            id: Uuid::new_v4(),
            role: Role::User,
            display_text: display_text.into(),
            attachment,
            structured: None,
            created_at: Utc::now(),
        };
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Append an assistant message carrying its structured response
    pub fn push_assistant(
        &mut self,
        display_text: impl Into<String>,
        structured: StructuredResponse,
    ) -> Uuid {
        let message = Message {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            display_text: display_text.into(),
            attachment: None,
            structured: Some(structured),
            created_at: Utc::now(),
        };
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// All messages, in append order
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent structured response, if any
    #[must_use]
    pub fn latest_analysis(&self) -> Option<&StructuredResponse> {
        self.messages
            .iter()
            .rev()
            .find_map(|message| message.structured.as_ref())
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
