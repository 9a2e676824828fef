// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `venuebot serve` command implementation.
//!
//! Connects the spreadsheet and the model, then runs the webhook gateway
//! until Ctrl+C or SIGTERM.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use venuebot_agent::InstructionTemplate;
use venuebot_config::VenueConfig;
use venuebot_core::{PluginAdapter, VenueError};
use venuebot_gateway::{GatewayState, HealthState};

use crate::wiring::{self, Venue};

/// Runs the `venuebot serve` command.
pub async fn run_serve(config: VenueConfig) -> Result<(), VenueError> {
    crate::init_tracing(&config.agent.log_level);
    info!("starting venuebot serve");

    let store = wiring::connect_store(&config)?;
    let provider = wiring::connect_provider(&config)?;
    let venue = Venue::assemble(&config, store.clone(), wiring::system_clock(&config)?);

    // Warm the cache so the first customer does not wait on the sheet.
    if let Err(e) = venue.knowledge.refresh().await {
        warn!(error = %e, "initial knowledge load failed, will retry on first message");
    }

    let instruction = InstructionTemplate::load(&config.agent).await;
    let handler = Arc::new(venue.handler(&config, provider.clone(), instruction));

    let (server, messenger) = venuebot_gateway::from_config(&config.gateway)?;
    if config.gateway.verify_token.is_none() {
        warn!("gateway.verify_token is not set, webhook verification will be refused");
    }
    if messenger.is_none() {
        warn!("gateway.page_access_token is not set, replies will only be logged");
    }

    let mut adapters: Vec<Arc<dyn PluginAdapter>> = Vec::new();
    adapters.push(store);
    adapters.push(provider);
    if let Some(ref m) = messenger {
        adapters.push(m.clone());
    }

    let state = GatewayState {
        handler,
        verify_token: config
            .gateway
            .verify_token
            .as_ref()
            .map(|t| SecretString::from(t.clone())),
        messenger,
        health: HealthState {
            start_time: std::time::Instant::now(),
            adapters,
        },
    };

    venuebot_gateway::start_server(&server, state, shutdown_signal()).await
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
