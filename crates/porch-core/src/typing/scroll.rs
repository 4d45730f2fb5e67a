//! Scroll coalescing for the message view.

use uuid::Uuid;

/// Vertical alignment when bringing a message into view.
///
/// The latest user message is bottom-aligned so it sits fully in view;
/// the latest bot message is top-aligned so a long reply starts at the
/// top of the visible area instead of ending flush at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlignment {
    Top,
    Bottom,
}

/// A request to scroll a message into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub message_id: Uuid,
    pub alignment: ScrollAlignment,
}

/// Latch that coalesces scroll requests to at most one per frame.
///
/// Ticks may request a scroll many times between frames; the renderer
/// takes the latest request once per frame and the latch resets.
#[derive(Debug, Default)]
pub struct ScrollLatch {
    pending: Option<ScrollRequest>,
}

impl ScrollLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scroll request, replacing any pending one.
    pub fn request(&mut self, message_id: Uuid, alignment: ScrollAlignment) {
        self.pending = Some(ScrollRequest {
            message_id,
            alignment,
        });
    }

    /// Takes the coalesced request for this frame, if any.
    pub fn take(&mut self) -> Option<ScrollRequest> {
        self.pending.take()
    }

    /// Drops any pending request. Used on teardown.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_many_requests_one_take() {
        let mut latch = ScrollLatch::new();
        let first = Uuid::new_v4();
        let last = Uuid::new_v4();

        latch.request(first, ScrollAlignment::Bottom);
        latch.request(last, ScrollAlignment::Top);

        let request = latch.take().unwrap();
        assert_eq!(request.message_id, last);
        assert_eq!(request.alignment, ScrollAlignment::Top);
        assert!(latch.take().is_none());
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut latch = ScrollLatch::new();
        latch.request(Uuid::new_v4(), ScrollAlignment::Top);
        latch.clear();
        assert!(!latch.is_pending());
    }
}
