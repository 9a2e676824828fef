// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound replies through the Messenger Send API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use venuebot_core::types::{AdapterType, HealthStatus};
use venuebot_core::{PluginAdapter, VenueError};

/// Messenger rejects text longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Sends text messages to page-scoped user ids.
pub struct MessengerClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: SecretString,
}

impl MessengerClient {
    /// `graph_api_url` is the versioned Graph base, e.g. `https://graph.facebook.com/v21.0`.
    pub fn new(graph_api_url: &str, access_token: SecretString) -> Result<Self, VenueError> {
        let mut endpoint = Url::parse(graph_api_url)
            .map_err(|e| VenueError::Config(format!("invalid gateway.graph_api_url: {e}")))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| VenueError::Config("gateway.graph_api_url cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(["me", "messages"]);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| VenueError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            endpoint,
            access_token,
        })
    }

    /// Sends `text` to `recipient_id`, split into as many messages as needed.
    pub async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), VenueError> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            self.send_chunk(recipient_id, &chunk).await?;
        }
        Ok(())
    }

    async fn send_chunk(&self, recipient_id: &str, text: &str) -> Result<(), VenueError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("access_token", self.access_token.expose_secret());

        let body = serde_json::json!({
            "recipient": {"id": recipient_id},
            "messaging_type": "RESPONSE",
            "message": {"text": text},
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VenueError::Channel {
                message: format!("send API request failed: {}", e.without_url()),
                source: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VenueError::Channel {
                message: format!("send API returned {status}: {text}"),
                source: None,
            });
        }
        debug!(recipient = recipient_id, chars = text.chars().count(), "reply sent");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MessengerClient {
    fn name(&self) -> &str {
        "messenger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, VenueError> {
        Ok(HealthStatus::Healthy)
    }
}

/// Splits on character boundaries, preferring the last newline or space in
/// each window.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());
        if end < chars.len()
            && !chars[end].is_whitespace()
            && let Some(cut) = chars[start..end]
                .iter()
                .rposition(|c| *c == '\n' || *c == ' ')
                .filter(|cut| *cut > 0)
        {
            end = start + cut + 1;
        }
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        start = end;
    }
    chunks
}
