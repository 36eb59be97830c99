use std::fmt;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::protocol::EmailMessage;
use tracing::debug;
use url::Url;

use crate::Notifier;

pub const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct HttpNotifierConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub from: String,
}

impl fmt::Debug for HttpNotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpNotifierConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends through a hosted email API that takes a JSON body and a bearer key.
pub struct HttpNotifier {
    http: Client,
    config: HttpNotifierConfig,
}

impl HttpNotifier {
    pub fn new(config: HttpNotifierConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: HttpNotifierConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let body = OutboundEmail {
            from: &self.config.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| {
                format!(
                    "failed to reach notification api at {}",
                    self.config.endpoint
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!(
                "notification api rejected message to {}: {status} {}",
                message.to,
                detail.trim()
            );
        }

        debug!(to = %message.to, %status, "notification accepted");
        Ok(())
    }
}
