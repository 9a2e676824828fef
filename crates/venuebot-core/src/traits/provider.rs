// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for the hosted language model.

use async_trait::async_trait;

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::VenueError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for a language model with function calling.
///
/// A single `generate` call returns either final text or a set of function
/// calls; the message handler runs the tools and calls `generate` again.
#[async_trait]
pub trait ChatProvider: PluginAdapter {
    /// Sends the conversation and returns the model's next response.
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, VenueError>;
}
