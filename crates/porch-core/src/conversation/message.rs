//! Conversation message types.
//!
//! This module contains types for representing messages in the widget
//! transcript, including roles and message content.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::links::Link;

/// Represents the sender of a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the site visitor.
    User,
    /// Reply produced by the backend webhook.
    Bot,
}

/// A single message in the widget transcript.
///
/// Identity is the `id`, used to target in-place text updates while a
/// reply is being typed out. `links` is populated once for bot messages
/// when the reply arrives and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Who sent the message.
    pub role: MessageRole,
    /// The message text. Mutable while a typing session targets this
    /// message; the full reply once the session finishes.
    pub text: String,
    /// Call-to-action links extracted from the full reply (bot only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl Message {
    /// Creates a message with a fresh id and the current timestamp.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            links: Vec::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a message with precomputed CTA links attached.
    pub fn with_links(role: MessageRole, text: impl Into<String>, links: Vec<Link>) -> Self {
        Self {
            links,
            ..Self::new(role, text)
        }
    }

    /// True when the message came from the backend webhook.
    pub fn is_bot(&self) -> bool {
        self.role == MessageRole::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_has_unique_id() {
        let a = Message::new(MessageRole::User, "hi");
        let b = Message::new(MessageRole::User, "hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_with_links_attaches_links() {
        let links = vec![Link {
            url: "https://spanmor.com.au/contact".to_string(),
            label: "Call us".to_string(),
        }];
        let message = Message::with_links(MessageRole::Bot, "", links.clone());
        assert!(message.is_bot());
        assert_eq!(message.links, links);
    }
}
