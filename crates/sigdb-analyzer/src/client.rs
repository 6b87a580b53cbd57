//! HTTP client for the external channel-analysis worker.
//!
//! The worker exposes a single webhook that accepts a channel username and
//! kicks off scraping/classification out of band; results come back later
//! through the server's analysis callback endpoint. The trigger itself
//! carries no delivery guarantee — callers treat it as at-most-one attempt.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::AnalyzerError;

#[derive(Debug, Serialize)]
struct TriggerPayload<'a> {
    #[serde(rename = "channelUsername")]
    channel_username: &'a str,
}

/// Client for the analysis worker's scrape-channel webhook.
///
/// Holds the HTTP client and the fully-qualified webhook URL. Point
/// `webhook_url` at a mock server in tests.
#[derive(Debug)]
pub struct AnalyzerClient {
    client: Client,
    webhook_url: Url,
}

impl AnalyzerClient {
    /// Creates a new client for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidWebhookUrl`] if `webhook_url` does not
    /// parse, or [`AnalyzerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(webhook_url: &str, timeout_secs: u64) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sigdb/0.1 (channel-analysis)")
            .build()?;

        let webhook_url =
            Url::parse(webhook_url).map_err(|e| AnalyzerError::InvalidWebhookUrl {
                url: webhook_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Asks the worker to (re-)analyze a channel.
    ///
    /// Sends `{"channelUsername": ...}` and checks only the HTTP status; no
    /// response body contract is relied upon.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] on network failure or a non-2xx
    /// status.
    pub async fn trigger(&self, channel_username: &str) -> Result<(), AnalyzerError> {
        self.client
            .post(self.webhook_url.clone())
            .json(&TriggerPayload { channel_username })
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(channel_id = %channel_username, "analysis trigger accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_webhook_url() {
        let err = AnalyzerClient::new("not a url", 30).expect_err("must fail");
        assert!(matches!(err, AnalyzerError::InvalidWebhookUrl { .. }));
    }

    #[test]
    fn trigger_payload_uses_wire_field_name() {
        let json = serde_json::to_value(TriggerPayload {
            channel_username: "examplechan",
        })
        .expect("serialize");
        assert_eq!(json["channelUsername"], "examplechan");
    }
}
