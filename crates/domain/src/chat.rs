use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message in a conversation transcript.
///
/// Transcripts are append-only: once a message is stored it is never
/// mutated or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Present when the assistant dispatched a tool for this turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Record of a tool dispatch attached to an assistant message.
///
/// `result` holds the raw tool-server response; `None` means the
/// dispatch failed before a response arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

// ── Convenience constructors ───────────────────────────────────────

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            content: text.into(),
            timestamp: Utc::now(),
            tool_call: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: text.into(),
            timestamp: Utc::now(),
            tool_call: None,
        }
    }

    pub fn with_tool_call(mut self, record: ToolCallRecord) -> Self {
        self.tool_call = Some(record);
        self
    }
}
