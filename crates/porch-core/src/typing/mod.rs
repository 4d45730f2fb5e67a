//! Typewriter reveal of bot replies.
//!
//! A reply is revealed one character per tick. Links are computed once
//! on the full text before the first tick; while revealing, each
//! physical line passes through the sanitizer so a raw or partial URL
//! never flashes on screen.
//!
//! # Module Structure
//!
//! - `sanitize`: stable plain-text rendering of partially revealed lines
//! - `session`: reveal progress for the message currently typing
//! - `scroll`: per-frame coalescing of scroll-into-view requests
//! - `engine`: the tick-driven state machine

mod engine;
mod sanitize;
mod scroll;
mod session;

// Re-export public API
pub use engine::{TickOutcome, TypewriterEngine};
pub use sanitize::sanitize_line;
pub use scroll::{ScrollAlignment, ScrollLatch, ScrollRequest};
pub use session::TypingSession;
