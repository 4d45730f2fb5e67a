//! The widget orchestrator.
//!
//! Ties the transcript, link extractor, and typewriter together behind
//! the [`ChatBackend`] seam. All mutation happens through `&mut self`
//! from the host event loop: user actions, webhook completions, and
//! timer ticks are serialized, so a render between two calls always
//! sees a consistent state.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{QuickReply, WidgetConfig};
use crate::conversation::{MessageRole, Transcript};
use crate::error::Result;
use crate::links::{Link, LinkExtractor};
use crate::typing::{ScrollAlignment, ScrollRequest, TickOutcome, TypewriterEngine};

/// Fixed bot reply appended when the webhook call fails.
///
/// Failures are never surfaced as a crash and never retried; the input
/// stays enabled so the visitor can try again.
pub const SEND_FAILURE_REPLY: &str =
    "Sorry, something went wrong on our end. Please try again in a moment.";

/// Transport seam between the widget and the webhook.
///
/// Implemented by `porch-webhook`; mocked in tests. We use dynamic-free
/// generics here so the widget owns its backend directly.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a visitor message and returns the raw reply text.
    async fn send_message(
        &self,
        session_id: &str,
        route: &str,
        user_id: &str,
        text: &str,
    ) -> Result<String>;

    /// Legacy session bootstrap. The current flow synthesizes a local
    /// welcome message instead of calling this.
    async fn load_previous_session(
        &self,
        session_id: &str,
        route: &str,
        user_id: &str,
    ) -> Result<String>;
}

/// The embeddable chat widget engine.
///
/// Holds the conversation transcript, the typewriter, the send guard,
/// and the display flags. One instance per embedded widget.
pub struct ChatWidget<B: ChatBackend> {
    config: WidgetConfig,
    backend: B,
    transcript: Transcript,
    typewriter: TypewriterEngine,
    extractor: LinkExtractor,
    user_id: String,
    session_id: Option<String>,
    sending: bool,
    open: bool,
    input: String,
}

impl<B: ChatBackend> ChatWidget<B> {
    /// Creates a closed widget with no active conversation.
    pub fn new(config: WidgetConfig, backend: B) -> Self {
        let typewriter = TypewriterEngine::new(config.typing_interval_ms);
        let extractor = LinkExtractor::new(config.allowed_domain.clone());
        Self {
            config,
            backend,
            transcript: Transcript::new(),
            typewriter,
            extractor,
            user_id: Uuid::new_v4().to_string(),
            session_id: None,
            sending: false,
            open: false,
            input: String::new(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// True while a send is outstanding.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    /// The current input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Starts a conversation with the fixed local welcome message.
    ///
    /// No network call is made. Idempotent: a second call keeps the
    /// existing session and appends nothing.
    pub fn start_conversation(&mut self) -> String {
        if let Some(existing) = &self.session_id {
            return existing.clone();
        }
        let session_id = Uuid::new_v4().to_string();
        tracing::info!(%session_id, "conversation started");
        let welcome = self.config.branding.welcome_text.clone();
        let message_id = self.transcript.push(MessageRole::Bot, welcome);
        self.typewriter
            .request_scroll(message_id, ScrollAlignment::Top);
        self.session_id = Some(session_id.clone());
        session_id
    }

    /// Sends visitor text through the single-flight guard.
    ///
    /// Returns `Ok(false)` without touching the transcript while a send
    /// is outstanding, when the trimmed text is empty, or when no
    /// conversation has started. On transport failure the guard clears
    /// and a fixed apology is appended as a bot message; nothing is
    /// retried.
    pub async fn send(&mut self, text: &str) -> Result<bool> {
        let trimmed = text.trim();
        let Some(session_id) = self.session_id.clone() else {
            return Ok(false);
        };
        if self.sending || trimmed.is_empty() {
            return Ok(false);
        }

        self.sending = true;
        let message_id = self.transcript.push(MessageRole::User, trimmed);
        self.typewriter
            .request_scroll(message_id, ScrollAlignment::Bottom);
        tracing::debug!(%session_id, chars = trimmed.chars().count(), "sending message");

        let outcome = self
            .backend
            .send_message(&session_id, &self.config.route, &self.user_id, trimmed)
            .await;

        let started = match outcome {
            Ok(reply) => self
                .typewriter
                .start(&mut self.transcript, &self.extractor, &reply),
            Err(err) => {
                tracing::warn!(error = %err, "webhook send failed");
                let apology = self.transcript.push(MessageRole::Bot, SEND_FAILURE_REPLY);
                self.typewriter
                    .request_scroll(apology, ScrollAlignment::Top);
                Ok(None)
            }
        };

        self.sending = false;
        started?;
        Ok(true)
    }

    /// Sends and clears the input buffer. The buffer is restored when
    /// the guard blocked the send.
    pub async fn send_current_input(&mut self) -> Result<bool> {
        let text = std::mem::take(&mut self.input);
        let sent = self.send(&text).await?;
        if !sent && !text.trim().is_empty() {
            self.input = text;
        }
        Ok(sent)
    }

    /// Configured quick-reply shortcuts.
    pub fn quick_replies(&self) -> &[QuickReply] {
        &self.config.quick_replies
    }

    /// Sends the quick reply at `index` through the same guard.
    pub async fn send_quick_reply(&mut self, index: usize) -> Result<bool> {
        let Some(reply) = self.config.quick_replies.get(index).cloned() else {
            return Ok(false);
        };
        self.send(&reply.text).await
    }

    /// Advances the typewriter by one character.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.typewriter.tick(&mut self.transcript)
    }

    /// The tick period for the host timer, clamped to at least 1ms.
    pub fn typing_interval(&self) -> Duration {
        self.typewriter.interval()
    }

    /// True while a reply is being revealed.
    pub fn is_typing(&self) -> bool {
        self.typewriter.is_typing()
    }

    /// CTA links for a finalized bot message.
    ///
    /// `None` while a typing session still references the message, so
    /// buttons only render once the reveal completes.
    pub fn cta_links(&self, message_id: Uuid) -> Option<&[Link]> {
        if self.typewriter.is_typing_message(message_id) {
            return None;
        }
        self.transcript
            .get(message_id)
            .filter(|m| m.is_bot() && !m.links.is_empty())
            .map(|m| m.links.as_slice())
    }

    /// Skips the active reveal: the target message's text becomes the
    /// full reply immediately and its CTA links become renderable.
    ///
    /// Returns the finalized message id, or `None` when nothing was
    /// typing. The widget stays fully usable afterwards.
    pub fn skip_reveal(&mut self) -> Result<Option<Uuid>> {
        self.typewriter.finalize(&mut self.transcript)
    }

    /// Takes the coalesced scroll request for this frame.
    pub fn take_scroll(&mut self) -> Option<ScrollRequest> {
        self.typewriter.take_scroll()
    }

    /// Teardown: cancels any reveal and pending scroll. No tick may run
    /// after this.
    pub fn shutdown(&mut self) {
        self.typewriter.cancel();
        tracing::debug!("widget shut down");
    }
}
