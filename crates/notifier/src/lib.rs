//! The notification collaborator seam: whatever actually delivers RSVP emails.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::protocol::EmailMessage;
use tokio::sync::Mutex;
use tracing::{debug, info};

mod http;

pub use http::{HttpNotifier, HttpNotifierConfig, DEFAULT_ENDPOINT};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Accepts every message and only logs it. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "dry run: notification not sent"
        );
        debug!(body = %message.text, "dry run notification body");
        Ok(())
    }
}

/// Keeps delivered messages in memory; individual recipients can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    delivered: Mutex<Vec<EmailMessage>>,
    rejected_recipients: Mutex<HashSet<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reject(&self, recipient: impl Into<String>) {
        self.rejected_recipients
            .lock()
            .await
            .insert(recipient.into());
    }

    pub async fn accept(&self, recipient: &str) {
        self.rejected_recipients.lock().await.remove(recipient);
    }

    pub async fn delivered(&self) -> Vec<EmailMessage> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.rejected_recipients.lock().await.contains(&message.to) {
            return Err(anyhow!("recipient {} rejected by notifier", message.to));
        }
        self.delivered.lock().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
