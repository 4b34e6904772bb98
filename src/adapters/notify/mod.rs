//! Notification sinks
//!
//! A run publishes exactly one terminal message. [`WebhookSink`] delivers it to
//! an HTTP endpoint; [`LogSink`] only writes it to the log.

pub mod webhook;

use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use webhook::WebhookSink;

/// Environment variable read when no validated configuration is available
pub const WEBHOOK_URL_ENV: &str = "TABLESWAP_NOTIFICATION_WEBHOOK_URL";

const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination of the end-of-run message
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Publishes a message
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::Notification`] when delivery fails.
    async fn publish(&self, message: &str) -> Result<()>;
}

/// Sink that writes messages to the log
///
/// Used when no webhook could be configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn publish(&self, message: &str) -> Result<()> {
        tracing::warn!(message, "No notification endpoint configured, logging message");
        Ok(())
    }
}

/// Sink built from [`WEBHOOK_URL_ENV`], falling back to [`LogSink`]
pub fn sink_from_env() -> Arc<dyn NotificationSink> {
    let url = std::env::var(WEBHOOK_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty());

    match url.map(|url| WebhookSink::new(url, BOOTSTRAP_TIMEOUT)) {
        Some(Ok(sink)) => Arc::new(sink),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Bootstrap webhook unavailable, logging notifications");
            Arc::new(LogSink)
        }
        None => Arc::new(LogSink),
    }
}
