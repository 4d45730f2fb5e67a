//! Typing session state.

use uuid::Uuid;

/// Reveal progress for the bot message currently being typed out.
///
/// At most one session is ever alive. It is created when a reply starts
/// typing and destroyed when every character has been revealed; starting
/// a new reply finalizes the previous session losslessly first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSession {
    message_id: Uuid,
    full_text: String,
    revealed: usize,
}

impl TypingSession {
    pub(crate) fn new(message_id: Uuid, full_text: impl Into<String>) -> Self {
        Self {
            message_id,
            full_text: full_text.into(),
            revealed: 0,
        }
    }

    /// Id of the transcript message this session targets.
    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    /// The complete reply text being revealed.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Number of characters revealed so far.
    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    /// Total character count of the full text.
    pub fn total_chars(&self) -> usize {
        self.full_text.chars().count()
    }

    /// True once every character is visible.
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total_chars()
    }

    /// Reveals one more character. Saturates at the full length.
    pub(crate) fn advance(&mut self) {
        if !self.is_complete() {
            self.revealed += 1;
        }
    }

    /// The currently visible prefix, on a char boundary.
    pub fn visible_text(&self) -> &str {
        let byte_index = self
            .full_text
            .char_indices()
            .nth(self.revealed)
            .map(|(i, _)| i)
            .unwrap_or(self.full_text.len());
        &self.full_text[..byte_index]
    }
}
