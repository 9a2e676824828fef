// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the assistant from configuration.
//!
//! [`Venue`] holds the spreadsheet-backed services; [`Venue::handler`] puts a
//! model and a session store in front of them.

use std::sync::Arc;

use tracing::info;

use venuebot_agent::{InMemorySessionStore, InstructionTemplate, MessageHandler, venue_tools};
use venuebot_booking::{AvailabilityChecker, BookingRecorder};
use venuebot_config::VenueConfig;
use venuebot_core::{ChatProvider, TabularStore, VenueError};
use venuebot_gemini::GeminiProvider;
use venuebot_knowledge::{Clock, DateNormalizer, KnowledgeCache, SystemClock};
use venuebot_sheets::SheetsStore;

/// The spreadsheet-backed half of the assistant.
pub struct Venue {
    pub clock: Arc<dyn Clock>,
    pub normalizer: DateNormalizer,
    pub knowledge: Arc<KnowledgeCache>,
    pub checker: Arc<AvailabilityChecker>,
    pub recorder: Arc<BookingRecorder>,
}

impl Venue {
    pub fn assemble(
        config: &VenueConfig,
        store: Arc<dyn TabularStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let normalizer = DateNormalizer::new(config.dates.order);
        let knowledge = Arc::new(KnowledgeCache::new(
            store.clone(),
            clock.clone(),
            &config.cache,
        ));
        let checker = Arc::new(AvailabilityChecker::new(
            store.clone(),
            clock.clone(),
            normalizer,
            &config.availability,
        ));
        let recorder = Arc::new(BookingRecorder::new(
            store,
            knowledge.clone(),
            checker.clone(),
            clock.clone(),
            config.booking.clone(),
        ));
        Self {
            clock,
            normalizer,
            knowledge,
            checker,
            recorder,
        }
    }

    /// The conversation handler, with the venue tools registered.
    pub fn handler(
        &self,
        config: &VenueConfig,
        provider: Arc<dyn ChatProvider>,
        instruction: InstructionTemplate,
    ) -> MessageHandler {
        let tools = Arc::new(venue_tools(
            self.knowledge.clone(),
            self.checker.clone(),
            self.recorder.clone(),
        ));
        let sessions = Arc::new(InMemorySessionStore::new(&config.session));
        MessageHandler::new(
            provider,
            tools,
            sessions,
            self.knowledge.clone(),
            self.clock.clone(),
            instruction,
            &config.agent,
        )
    }
}

/// Connects to the configured spreadsheet.
pub fn connect_store(config: &VenueConfig) -> Result<Arc<SheetsStore>, VenueError> {
    let env = std::env::var(venuebot_sheets::CREDENTIALS_ENV).ok();
    let store = venuebot_sheets::connect(&config.sheets, env.as_deref())?;
    info!(
        spreadsheet = %config.sheets.spreadsheet_id.as_deref().unwrap_or(&config.sheets.spreadsheet_name),
        "spreadsheet store ready"
    );
    Ok(Arc::new(store))
}

/// Builds the Gemini provider from config or `GEMINI_API_KEY`.
pub fn connect_provider(config: &VenueConfig) -> Result<Arc<GeminiProvider>, VenueError> {
    let env = std::env::var(venuebot_gemini::API_KEY_ENV).ok();
    let provider = GeminiProvider::new(&config.gemini, env.as_deref())?;
    info!(model = provider.model(), "gemini provider ready");
    Ok(Arc::new(provider))
}

/// Venue-local clock from `dates.utc_offset_minutes`.
pub fn system_clock(config: &VenueConfig) -> Result<Arc<dyn Clock>, VenueError> {
    Ok(Arc::new(SystemClock::from_config(&config.dates)?))
}
