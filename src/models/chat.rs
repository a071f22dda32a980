//! Chat Models
//!
//! Group chat messages as read by the assistant flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of chat message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageKind {
    #[default]
    Text,
    Image,
    File,
}

/// A message posted to a group chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub group_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: ChatMessageKind,
}

impl ChatMessage {
    /// `"{sender}: {message}"`, or `None` for attachments and blank text.
    pub fn history_line(&self) -> Option<String> {
        let text = self.message.trim();
        if self.kind != ChatMessageKind::Text || text.is_empty() {
            return None;
        }
        Some(format!("{}: {}", self.sender_name.trim(), text))
    }
}

/// Flatten messages into the line-per-message history the assistant reads,
/// oldest first.
pub fn history_lines(messages: &[ChatMessage]) -> Vec<String> {
    let mut ordered: Vec<&ChatMessage> = messages.iter().collect();
    ordered.sort_by_key(|m| m.timestamp);
    ordered.into_iter().filter_map(ChatMessage::history_line).collect()
}
