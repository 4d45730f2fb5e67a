//! Tick-driven typewriter state machine.

use std::time::Duration;

use uuid::Uuid;

use crate::conversation::Transcript;
use crate::error::Result;
use crate::links::LinkExtractor;

use super::scroll::{ScrollAlignment, ScrollLatch, ScrollRequest};
use super::session::TypingSession;

/// Result of advancing the typewriter by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session is active.
    Idle,
    /// One more character became visible.
    Revealed,
    /// The session completed on this tick; the message is final.
    Finished(Uuid),
}

/// Reveals bot replies one character at a time on a fixed-period tick.
///
/// Only one message is ever typing. Starting a new reveal finalizes the
/// previous one losslessly first, so no characters are dropped when
/// replies arrive back to back.
#[derive(Debug)]
pub struct TypewriterEngine {
    session: Option<TypingSession>,
    interval: Duration,
    scroll: ScrollLatch,
}

impl TypewriterEngine {
    /// Creates an engine ticking once per character every `interval_ms`
    /// milliseconds, clamped to at least 1ms.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            session: None,
            interval: Duration::from_millis(interval_ms.max(1)),
            scroll: ScrollLatch::new(),
        }
    }

    /// The tick period the host loop should use.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True while a reveal is in progress.
    pub fn is_typing(&self) -> bool {
        self.session.is_some()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&TypingSession> {
        self.session.as_ref()
    }

    /// True while `message_id` is the reveal target. CTA links for a bot
    /// message become renderable once this returns false.
    pub fn is_typing_message(&self, message_id: Uuid) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.message_id() == message_id)
    }

    /// Begins revealing `full_text` as a new bot message.
    ///
    /// Any active session is finalized synchronously first. Empty
    /// (trimmed) text appends nothing and returns `Ok(None)`; no empty
    /// bubble is created. Links are extracted once from the full text
    /// and attached to the message before the first tick.
    pub fn start(
        &mut self,
        transcript: &mut Transcript,
        extractor: &LinkExtractor,
        full_text: &str,
    ) -> Result<Option<Uuid>> {
        self.finalize(transcript)?;

        let trimmed = full_text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let links = extractor.extract(trimmed);
        let message_id = transcript.push_bot_with_links("", links);
        self.session = Some(TypingSession::new(message_id, trimmed));
        tracing::debug!(%message_id, chars = trimmed.chars().count(), "typing session started");

        Ok(Some(message_id))
    }

    /// Advances the reveal by one character and updates the target
    /// message's text to the visible prefix.
    ///
    /// Each tick also requests a coalesced scroll of the message view;
    /// the host takes at most one request per frame via
    /// [`TypewriterEngine::take_scroll`].
    pub fn tick(&mut self, transcript: &mut Transcript) -> Result<TickOutcome> {
        let Some(session) = self.session.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        session.advance();
        let message_id = session.message_id();
        let complete = session.is_complete();
        let visible = session.visible_text().to_string();

        transcript.set_text(message_id, visible)?;
        self.scroll.request(message_id, ScrollAlignment::Top);

        if complete {
            self.session = None;
            tracing::debug!(%message_id, "typing session finished");
            return Ok(TickOutcome::Finished(message_id));
        }
        Ok(TickOutcome::Revealed)
    }

    /// Finalizes the active session losslessly: the target message's
    /// text is set to the full reply and the session is cleared.
    pub fn finalize(&mut self, transcript: &mut Transcript) -> Result<Option<Uuid>> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        let message_id = session.message_id();
        transcript.set_text(message_id, session.full_text())?;
        tracing::debug!(%message_id, "typing session finalized early");
        Ok(Some(message_id))
    }

    /// Cancels any active session and pending scroll without touching
    /// the transcript. For teardown: no tick may run after this.
    pub fn cancel(&mut self) {
        self.session = None;
        self.scroll.clear();
    }

    /// Records that a message should scroll into view.
    pub fn request_scroll(&mut self, message_id: Uuid, alignment: ScrollAlignment) {
        self.scroll.request(message_id, alignment);
    }

    /// Takes the coalesced scroll request for this frame, if any.
    pub fn take_scroll(&mut self) -> Option<ScrollRequest> {
        self.scroll.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MessageRole;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new("spanmor.com.au")
    }

    #[test]
    fn test_reveal_is_monotone_and_stops_exactly_at_length() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        let id = engine
            .start(&mut transcript, &extractor(), "abc")
            .unwrap()
            .unwrap();

        let mut previous = 0;
        loop {
            let outcome = engine.tick(&mut transcript).unwrap();
            let visible = transcript.get(id).unwrap().text.chars().count();
            assert!(visible >= previous);
            previous = visible;
            match outcome {
                TickOutcome::Revealed => assert!(visible < 3),
                TickOutcome::Finished(done) => {
                    assert_eq!(done, id);
                    assert_eq!(visible, 3);
                    break;
                }
                TickOutcome::Idle => panic!("session ended without finishing"),
            }
        }

        assert!(!engine.is_typing());
        assert_eq!(engine.tick(&mut transcript).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn test_starting_second_reveal_finalizes_first_losslessly() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        let first = engine
            .start(&mut transcript, &extractor(), "first reply")
            .unwrap()
            .unwrap();
        engine.tick(&mut transcript).unwrap();
        engine.tick(&mut transcript).unwrap();

        let second = engine
            .start(&mut transcript, &extractor(), "second")
            .unwrap()
            .unwrap();

        assert_eq!(transcript.get(first).unwrap().text, "first reply");
        assert!(engine.is_typing_message(second));
        assert!(!engine.is_typing_message(first));
    }

    #[test]
    fn test_empty_reply_creates_no_bubble() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        let started = engine.start(&mut transcript, &extractor(), "  \n ").unwrap();
        assert!(started.is_none());
        assert!(transcript.is_empty());
        assert!(!engine.is_typing());
    }

    #[test]
    fn test_links_attached_before_first_tick() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        let id = engine
            .start(
                &mut transcript,
                &extractor(),
                "[Quote](https://spanmor.com.au/quote)",
            )
            .unwrap()
            .unwrap();

        let message = transcript.get(id).unwrap();
        assert!(message.text.is_empty());
        assert_eq!(message.links.len(), 1);
    }

    #[test]
    fn test_ticks_coalesce_to_one_scroll_request() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        let id = engine
            .start(&mut transcript, &extractor(), "abcdef")
            .unwrap()
            .unwrap();

        engine.tick(&mut transcript).unwrap();
        engine.tick(&mut transcript).unwrap();
        engine.tick(&mut transcript).unwrap();

        let request = engine.take_scroll().unwrap();
        assert_eq!(request.message_id, id);
        assert_eq!(request.alignment, ScrollAlignment::Top);
        assert!(engine.take_scroll().is_none());
    }

    #[test]
    fn test_cancel_clears_session_and_scroll() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        engine
            .start(&mut transcript, &extractor(), "reply")
            .unwrap();
        engine.tick(&mut transcript).unwrap();

        engine.cancel();
        assert!(!engine.is_typing());
        assert!(engine.take_scroll().is_none());
        assert_eq!(engine.tick(&mut transcript).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn test_interval_clamped_to_one_millisecond() {
        let engine = TypewriterEngine::new(0);
        assert_eq!(engine.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_request_scroll_for_user_message() {
        let mut transcript = Transcript::new();
        let mut engine = TypewriterEngine::new(1);
        let id = transcript.push(MessageRole::User, "hi");
        engine.request_scroll(id, ScrollAlignment::Bottom);

        let request = engine.take_scroll().unwrap();
        assert_eq!(request.alignment, ScrollAlignment::Bottom);
    }
}
