//! Conversation domain module.
//!
//! Contains the message model and the ordered transcript the widget
//! renders from.
//!
//! # Module Structure
//!
//! - `message`: message types (`MessageRole`, `Message`)
//! - `transcript`: ordered message list with in-place text updates

mod message;
mod transcript;

// Re-export public API
pub use message::{Message, MessageRole};
pub use transcript::Transcript;
