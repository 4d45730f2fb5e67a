//! HTTP transport for the Porch widget.
//!
//! Implements the `ChatBackend` seam over a single webhook endpoint:
//! one JSON envelope out, one reply shape back, a fixed default when
//! the reply is unusable, and no retries.

mod client;
mod payload;

// Re-export public API
pub use client::WebhookClient;
pub use payload::{ChatAction, ChatRequest, DEFAULT_REPLY, Metadata, reply_text};
