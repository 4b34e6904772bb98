//! Webhook notification sink
//!
//! Posts the run message as a small JSON document to an operator endpoint.

use super::NotificationSink;
use crate::config::NotificationConfig;
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::time::Duration;

/// Value of the `source` field of every payload
pub const PAYLOAD_SOURCE: &str = "tableswap";

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    source: &'a str,
    message: &'a str,
}

/// Notification sink posting to an HTTP webhook
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    /// Builds a sink for `url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SyncError::Notification(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Builds a sink from the notification section
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let url = config.webhook_url.as_deref().ok_or_else(|| {
            SyncError::Configuration("notification.webhook_url is required".to_string())
        })?;
        Self::new(url, Duration::from_secs(config.timeout_seconds))
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn publish(&self, message: &str) -> Result<()> {
        let payload = WebhookPayload {
            source: PAYLOAD_SOURCE,
            message,
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::Notification(format!("Webhook request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Notification(format!(
                "Webhook returned status {status}: {body}"
            )));
        }

        tracing::debug!(status = %resp.status(), "Notification delivered");
        Ok(())
    }
}
