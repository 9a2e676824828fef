// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use venuebot_core::types::HealthStatus;
use venuebot_core::SessionId;

use crate::server::GatewayState;

/// Query parameters of the subscription handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Event notification body. Only fields the assistant reads are modeled.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
pub struct Participant {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
    /// Set on copies of messages the page itself sent.
    #[serde(default)]
    pub is_echo: bool,
}

/// Request body for POST /v1/messages.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
    /// Conversation identity. A random one is assigned when absent.
    #[serde(default)]
    pub sender_id: Option<String>,
}

/// Response body for POST /v1/messages.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub reply: String,
    pub sender_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every adapter is healthy, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub open_conversations: usize,
    pub adapters: Vec<AdapterHealth>,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub kind: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /
pub async fn get_root() -> &'static str {
    "venuebot is running"
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut adapters = Vec::with_capacity(state.health.adapters.len());
    for adapter in &state.health.adapters {
        let (status, detail) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy", None),
            Ok(HealthStatus::Degraded(d)) => ("degraded", Some(d)),
            Ok(HealthStatus::Unhealthy(d)) => ("unhealthy", Some(d)),
            Err(e) => ("unhealthy", Some(e.to_string())),
        };
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            kind: adapter.adapter_type().to_string(),
            status: status.to_string(),
            detail,
        });
    }
    let all_healthy = adapters.iter().all(|a| a.status == "healthy");

    Json(HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        open_conversations: state.handler.open_conversations().await,
        adapters,
    })
}

/// GET /webhook
///
/// Echoes `hub.challenge` when `hub.verify_token` matches, 403 otherwise.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let matches = match (&state.verify_token, &query.verify_token) {
        (Some(expected), Some(presented)) => presented == expected.expose_secret(),
        _ => false,
    };
    if !matches {
        warn!(mode = ?query.mode, "webhook verification rejected");
        return (StatusCode::FORBIDDEN, "Invalid verification token").into_response();
    }
    info!(mode = ?query.mode, "webhook verified");
    (StatusCode::OK, query.challenge.unwrap_or_default()).into_response()
}

/// POST /webhook
///
/// Handles every text message in the payload in order, then acknowledges.
/// Malformed or foreign payloads are logged and acknowledged too, so the
/// platform does not redeliver them.
pub async fn receive_webhook(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "unparseable webhook payload");
            return StatusCode::OK;
        }
    };
    if payload.object != "page" {
        debug!(object = %payload.object, "ignoring non-page webhook");
        return StatusCode::OK;
    }

    for event in payload.entry.into_iter().flat_map(|e| e.messaging) {
        let Some(message) = event.message else {
            continue;
        };
        if message.is_echo {
            continue;
        }
        let Some(text) = message.text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };

        let sender = event.sender.id;
        info!(sender = %sender, "message received");
        let reply = state
            .handler
            .reply(&text, &SessionId(sender.clone()))
            .await;

        match &state.messenger {
            Some(messenger) => {
                if let Err(e) = messenger.send_text(&sender, &reply).await {
                    warn!(sender = %sender, error = %e, "failed to deliver reply");
                }
            }
            None => info!(sender = %sender, reply = %reply, "reply (no page token, not sent)"),
        }
    }

    StatusCode::OK
}

/// POST /v1/messages
pub async fn post_messages(
    State(state): State<GatewayState>,
    Json(body): Json<MessageRequest>,
) -> Response {
    if body.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "content must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let sender_id = body
        .sender_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let reply = state
        .handler
        .reply(&body.content, &SessionId(sender_id.clone()))
        .await;

    Json(MessageResponse { reply, sender_id }).into_response()
}
