//! Message data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message.
///
/// Opaque and stable; unique within one partner's mailbox only. The same id
/// may exist independently in another partner's mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a new message ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single email message.
///
/// Serialized with camelCase field names; this is the persisted wire layout
/// under each partner's durable mailbox key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier within one partner's mailbox.
    pub id: MessageId,
    /// Sender display string.
    pub sender: String,
    /// Subject display string.
    pub subject: String,
    /// Short preview of the body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Full body; may contain markup rendered verbatim by the view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Message date, used for display only (the store never sorts by it).
    pub date: DateTime<Utc>,
    /// Whether the message has been read.
    #[serde(default)]
    pub is_read: bool,
    /// Whether the message is marked as spam.
    #[serde(default)]
    pub is_spam: bool,
}

impl Message {
    /// The snippet, or the empty string when the message has none.
    #[must_use]
    pub fn snippet_text(&self) -> &str {
        self.snippet.as_deref().unwrap_or_default()
    }
}
