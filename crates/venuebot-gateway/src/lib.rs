// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP front door for venuebot.
//!
//! Serves the Messenger-style webhook (verification handshake and message
//! events), a liveness and health endpoint, and an authenticated JSON chat
//! API. Every route funnels into one [`ConversationHandler`].

pub mod auth;
pub mod handlers;
pub mod messenger;
pub mod server;

use std::sync::Arc;

use secrecy::SecretString;

use venuebot_config::model::GatewayConfig;
use venuebot_core::VenueError;

pub use auth::AuthConfig;
pub use messenger::MessengerClient;
pub use server::{
    ConversationHandler, GatewayState, HealthState, ServerConfig, router, start_server,
};

/// Splits the gateway config into server settings and the Send API client.
pub fn from_config(
    config: &GatewayConfig,
) -> Result<(ServerConfig, Option<Arc<MessengerClient>>), VenueError> {
    let secret = |v: &Option<String>| {
        v.as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::from(s.clone()))
    };

    let server = ServerConfig {
        host: config.host.clone(),
        port: config.port,
        auth: AuthConfig {
            bearer_token: secret(&config.bearer_token),
        },
    };
    let messenger = match secret(&config.page_access_token) {
        Some(token) => Some(Arc::new(MessengerClient::new(&config.graph_api_url, token)?)),
        None => None,
    };
    Ok((server, messenger))
}
