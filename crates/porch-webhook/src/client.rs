//! Reqwest client for the webhook endpoint.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use porch_core::error::{PorchError, Result};
use porch_core::widget::ChatBackend;
use reqwest::Client;
use serde_json::Value;

use crate::payload::{self, ChatRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ENDPOINT_ENV: &str = "PORCH_WEBHOOK_URL";

/// HTTP backend that POSTs the widget envelope to a webhook endpoint.
///
/// One request, no retries: a rejected or timed-out call surfaces as a
/// transport error and the widget degrades to its fixed apology reply.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    endpoint: String,
}

impl WebhookClient {
    /// Creates a client for the given endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| PorchError::transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Loads the endpoint from the `PORCH_WEBHOOK_URL` environment
    /// variable.
    pub fn try_from_env() -> Result<Self> {
        let endpoint = env::var(ENDPOINT_ENV).map_err(|_| {
            PorchError::config(format!("{ENDPOINT_ENV} not set in the environment"))
        })?;
        Self::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &ChatRequest) -> Result<String> {
        tracing::debug!(action = ?request.action, endpoint = %self.endpoint, "posting to webhook");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| PorchError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PorchError::transport(format!(
                "webhook returned {status}"
            )));
        }

        // A body that fails to parse is treated as empty and falls
        // through to the default reply, not an error.
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(payload::reply_text(&body))
    }
}

#[async_trait]
impl ChatBackend for WebhookClient {
    async fn send_message(
        &self,
        session_id: &str,
        route: &str,
        user_id: &str,
        text: &str,
    ) -> Result<String> {
        self.post(&ChatRequest::send_message(session_id, route, user_id, text))
            .await
    }

    async fn load_previous_session(
        &self,
        session_id: &str,
        route: &str,
        user_id: &str,
    ) -> Result<String> {
        self.post(&ChatRequest::load_previous_session(
            session_id, route, user_id,
        ))
        .await
    }
}
