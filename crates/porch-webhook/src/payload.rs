//! Wire types for the webhook envelope.
//!
//! The widget POSTs one JSON shape for both operations; the action
//! field selects between an ordinary send and the legacy session
//! bootstrap. Replies come back as `{ "output": "..." }` or as an array
//! whose first element has that shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed reply substituted when the response carries no usable output.
///
/// Missing or malformed bodies are not an error path; they degrade to
/// this default so the conversation keeps moving.
pub const DEFAULT_REPLY: &str = "Thanks for reaching out! How can we help?";

/// The operation requested from the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatAction {
    SendMessage,
    LoadPreviousSession,
}

/// Metadata forwarded with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub user_id: String,
}

/// The JSON body POSTed to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub action: ChatAction,
    pub session_id: String,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_input: Option<String>,
    pub metadata: Metadata,
}

impl ChatRequest {
    /// Envelope for an ordinary visitor message.
    pub fn send_message(
        session_id: impl Into<String>,
        route: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            action: ChatAction::SendMessage,
            session_id: session_id.into(),
            route: route.into(),
            chat_input: Some(text.into()),
            metadata: Metadata {
                user_id: user_id.into(),
            },
        }
    }

    /// Envelope for the legacy session bootstrap.
    pub fn load_previous_session(
        session_id: impl Into<String>,
        route: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            action: ChatAction::LoadPreviousSession,
            session_id: session_id.into(),
            route: route.into(),
            chat_input: None,
            metadata: Metadata {
                user_id: user_id.into(),
            },
        }
    }
}

/// Extracts the bot reply text from a webhook response body.
///
/// Accepts a single object with an `output` field or an array whose
/// first element has that shape; anything else falls back to
/// [`DEFAULT_REPLY`].
pub fn reply_text(body: &Value) -> String {
    let output = match body {
        Value::Array(items) => items.first().and_then(|item| item.get("output")),
        other => other.get("output"),
    };
    output
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_REPLY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_message_envelope_shape() {
        let request = ChatRequest::send_message("s-1", "general", "u-1", "hello");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "action": "sendMessage",
                "sessionId": "s-1",
                "route": "general",
                "chatInput": "hello",
                "metadata": { "userId": "u-1" }
            })
        );
    }

    #[test]
    fn test_load_previous_session_omits_chat_input() {
        let request = ChatRequest::load_previous_session("s-1", "general", "u-1");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["action"], "loadPreviousSession");
        assert!(body.get("chatInput").is_none());
    }

    #[test]
    fn test_reply_from_object() {
        assert_eq!(reply_text(&json!({ "output": "hi there" })), "hi there");
    }

    #[test]
    fn test_reply_from_array_first_element() {
        assert_eq!(
            reply_text(&json!([{ "output": "first" }, { "output": "second" }])),
            "first"
        );
    }

    #[test]
    fn test_missing_output_falls_back_to_default() {
        assert_eq!(reply_text(&json!({ "result": "x" })), DEFAULT_REPLY);
        assert_eq!(reply_text(&json!([])), DEFAULT_REPLY);
        assert_eq!(reply_text(&Value::Null), DEFAULT_REPLY);
    }

    #[test]
    fn test_non_string_output_falls_back_to_default() {
        assert_eq!(reply_text(&json!({ "output": 42 })), DEFAULT_REPLY);
    }
}
