#![forbid(unsafe_code)]

//! Conversation message record.

use serde::{Deserialize, Serialize};

use crate::identity::{Identified, Searchable};

/// A message in a parent/advocate conversation.
///
/// Timestamps are kept as the RFC 3339 strings the messaging API returns;
/// this crate never does date arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub read_at: Option<String>,
}

impl Message {
    /// Create a message with just an id and content (other fields empty).
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conversation_id: String::new(),
            sender_id: String::new(),
            content: content.into(),
            created_at: String::new(),
            read_at: None,
        }
    }

    /// Set the conversation id.
    #[must_use]
    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = conversation_id.into();
        self
    }

    /// Set the sender id.
    #[must_use]
    pub fn with_sender(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = sender_id.into();
        self
    }

    /// Set the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Whether the recipient has read the message.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

impl Identified for Message {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

impl Searchable for Message {
    fn content(&self) -> Option<&str> {
        if self.content.is_empty() {
            None
        } else {
            Some(&self.content)
        }
    }
}
