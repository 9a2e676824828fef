// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model for deterministic testing.
//!
//! `MockProvider` implements `ChatProvider` with a scripted queue of
//! responses, so tool round-trips can be exercised without network calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use venuebot_core::chat::{ChatRequest, ChatResponse};
use venuebot_core::traits::adapter::PluginAdapter;
use venuebot_core::traits::provider::ChatProvider;
use venuebot_core::types::{AdapterType, HealthStatus};
use venuebot_core::VenueError;

/// One scripted step: a response or a provider failure.
#[derive(Debug, Clone)]
enum Step {
    Reply(ChatResponse),
    Fail(String),
}

/// A mock provider that pops pre-configured responses from a FIFO queue.
///
/// When the queue is empty, a default "mock response" text is returned.
/// Every request is recorded for later inspection.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with plain text replies.
    pub fn with_replies(replies: &[&str]) -> Self {
        let script = replies
            .iter()
            .map(|r| Step::Reply(ChatResponse::text(*r)))
            .collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            requests: Arc::default(),
        }
    }

    /// Queue a response.
    pub async fn push(&self, response: ChatResponse) {
        self.script.lock().await.push_back(Step::Reply(response));
    }

    /// Queue a provider failure.
    pub async fn push_error(&self, message: &str) {
        self.script
            .lock()
            .await
            .push_back(Step::Fail(message.to_string()));
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, VenueError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, VenueError> {
        self.requests.lock().await.push(request);
        match self.script.lock().await.pop_front() {
            Some(Step::Reply(response)) => Ok(response),
            Some(Step::Fail(message)) => Err(VenueError::provider(message)),
            None => Ok(ChatResponse::text("mock response")),
        }
    }
}
