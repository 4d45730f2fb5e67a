//! Ordered transcript of the conversation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PorchError, Result};
use crate::links::Link;

use super::message::{Message, MessageRole};

/// The ordered list of messages the widget renders from.
///
/// Messages are exclusively owned here; insertion order is preserved
/// and is the only ordering used for rendering and "last message"
/// scroll logic. Writes are whole-message replacements targeted by id,
/// so a render between two updates always sees a consistent message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its id.
    pub fn push(&mut self, role: MessageRole, text: impl Into<String>) -> Uuid {
        let message = Message::new(role, text);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Appends a bot message with precomputed CTA links.
    ///
    /// Used by the typewriter engine, which attaches links before the
    /// first character is revealed.
    pub fn push_bot_with_links(&mut self, text: impl Into<String>, links: Vec<Link>) -> Uuid {
        let message = Message::with_links(MessageRole::Bot, text, links);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Replaces the text of the message with the given id.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error if no message has that id.
    pub fn set_text(&mut self, id: Uuid, text: impl Into<String>) -> Result<()> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PorchError::not_found("message", id.to_string()))?;
        message.text = text.into();
        Ok(())
    }

    /// Looks up a message by id.
    pub fn get(&self, id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
