// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use secrecy::SecretString;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use venuebot_agent::{MessageHandler, SessionStore};
use venuebot_core::{PluginAdapter, SessionId, VenueError};

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;
use crate::messenger::MessengerClient;

/// The conversation behind the front doors.
#[async_trait]
pub trait ConversationHandler: Send + Sync + 'static {
    /// Reply to `text` from `identity`. Never fails.
    async fn reply(&self, text: &str, identity: &SessionId) -> String;

    /// Number of open conversations, for `/health`.
    async fn open_conversations(&self) -> usize;
}

#[async_trait]
impl ConversationHandler for MessageHandler {
    async fn reply(&self, text: &str, identity: &SessionId) -> String {
        self.handle(text, identity).await
    }

    async fn open_conversations(&self) -> usize {
        self.sessions().count().await
    }
}

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Adapters whose health is reported.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub handler: Arc<dyn ConversationHandler>,
    /// Token expected in `hub.verify_token`. `None` refuses every verification.
    pub verify_token: Option<SecretString>,
    /// Send API client. `None` means replies are only logged.
    pub messenger: Option<Arc<MessengerClient>>,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors `GatewayConfig` from venuebot-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token for `/v1/messages`. `None` leaves the route unmounted.
    pub auth: AuthConfig,
}

/// Builds the router:
/// - `GET /` liveness text
/// - `GET /health` JSON
/// - `GET`/`POST /webhook` platform verification and events
/// - `POST /v1/messages` (bearer auth, only when a token is configured)
pub fn router(state: GatewayState, auth: &AuthConfig) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route(
            "/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .with_state(state.clone());

    let mut app = Router::new().merge(public_routes);

    if auth.bearer_token.is_some() {
        let api_routes = Router::new()
            .route("/v1/messages", post(handlers::post_messages))
            .route_layer(axum_middleware::from_fn_with_state(
                auth.clone(),
                auth_middleware,
            ))
            .with_state(state);
        app = app.merge(api_routes);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), VenueError> {
    let app = router(state, &config.auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VenueError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(
        %addr,
        api = config.auth.bearer_token.is_some(),
        "gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| VenueError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway stopped");
    Ok(())
}
