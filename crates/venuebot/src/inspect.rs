// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `venuebot knowledge` and `venuebot check`: read-only views of the sheet.

use venuebot_config::VenueConfig;
use venuebot_core::VenueError;

use crate::wiring::{self, Venue};

/// Prints the rendered knowledge block.
pub async fn run_knowledge(config: VenueConfig) -> Result<(), VenueError> {
    crate::init_tracing(&config.agent.log_level);
    let venue = Venue::assemble(
        &config,
        wiring::connect_store(&config)?,
        wiring::system_clock(&config)?,
    );

    // Surface read errors here instead of printing an empty block.
    venue.knowledge.refresh().await?;
    println!("{}", venue.knowledge.render().await);
    Ok(())
}

/// Prints the availability verdict for `date` and `slot`.
///
/// `date` goes through the normalizer first, so any accepted format works.
pub async fn run_check(config: VenueConfig, date: &str, slot: &str) -> Result<(), VenueError> {
    crate::init_tracing(&config.agent.log_level);
    let venue = Venue::assemble(
        &config,
        wiring::connect_store(&config)?,
        wiring::system_clock(&config)?,
    );

    let iso = match venue.normalizer.normalize(date) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => date.to_string(),
    };
    let verdict = venue.checker.check(&iso, slot).await;
    println!("{iso} {slot}: {verdict}");
    Ok(())
}
