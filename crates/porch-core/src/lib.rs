//! Porch widget engine core.
//!
//! Domain logic for the embeddable chat widget: the conversation
//! transcript, CTA link extraction, the typing-display sanitizer, the
//! typewriter engine, and the widget orchestrator that ties them to a
//! webhook backend.
//!
//! The engine is single-threaded and cooperative: user actions, webhook
//! completions, and timer ticks are all serialized onto the host event
//! loop, so state updates never need locking.

pub mod config;
pub mod conversation;
pub mod error;
pub mod links;
pub mod typing;
pub mod widget;

// Re-export common error type
pub use error::PorchError;
