//! Best-effort delivery of accepted submissions to the configured webhook.
//!
//! Forwarding never fails the caller. The outcome is reported as a [`Delivery`] value so the
//! endpoint can tell the client whether the downstream automation received the payload.

use crate::{SubmissionError, SubmissionResult};
use async_trait::async_trait;
use std::time::Duration;

/// What happened to the outbound copy of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// No forwarding URL is configured
    NotConfigured,
    /// The target answered with a 2xx status
    Delivered {
        status: u16,
        response: serde_json::Value,
    },
    /// Transport error or non-2xx status; the submission is still accepted
    Failed {
        status: Option<u16>,
        reason: String,
    },
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }
}

#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Relays `payload` downstream. Must not panic or return early on failure.
    async fn forward(&self, payload: &serde_json::Value) -> Delivery;
}

/// POSTs the payload as JSON to a fixed URL.
///
/// Only `Content-Type: application/json` is attached; there is no authentication header.
#[derive(Debug, Clone)]
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
}

impl WebhookForwarder {
    /// # Errors
    ///
    /// Returns [`SubmissionError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> SubmissionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SubmissionError::HttpClient)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Forwarder for WebhookForwarder {
    async fn forward(&self, payload: &serde_json::Value) -> Delivery {
        let response = match self.client.post(&self.url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %self.url, "webhook request failed: {e}");
                return Delivery::Failed {
                    status: None,
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "webhook returned an error status");
            return Delivery::Failed {
                status: Some(status.as_u16()),
                reason: format!("webhook responded with {status}: {body}"),
            };
        }

        // Automation tools answer with JSON or plain text; keep whichever arrived.
        let response = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        tracing::info!(url = %self.url, status = status.as_u16(), "webhook delivered");

        Delivery::Delivered {
            status: status.as_u16(),
            response,
        }
    }
}
