// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venue tools exposed to the model.

pub mod availability;
pub mod booking;
pub mod info;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use venuebot_booking::{AvailabilityChecker, BookingRecorder};
use venuebot_knowledge::KnowledgeCache;

use crate::tool::{ToolOutput, ToolRegistry};

pub use availability::CheckAvailabilityTool;
pub use booking::BookDateTool;
pub use info::GeneralInfoTool;

/// Registry with the availability, fact lookup and booking tools.
pub fn venue_tools(
    knowledge: Arc<KnowledgeCache>,
    checker: Arc<AvailabilityChecker>,
    recorder: Arc<BookingRecorder>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CheckAvailabilityTool::new(checker)));
    registry.register(Arc::new(GeneralInfoTool::new(knowledge)));
    registry.register(Arc::new(BookDateTool::new(recorder)));
    registry
}

/// Deserializes tool arguments, turning a mismatch into an error output the
/// model can correct.
pub(crate) fn parse_args<T: DeserializeOwned>(
    tool: &str,
    input: serde_json::Value,
) -> Result<T, ToolOutput> {
    serde_json::from_value(input).map_err(|e| {
        tracing::debug!(tool, error = %e, "rejected tool arguments");
        ToolOutput::error(format!("invalid arguments for {tool}: {e}"))
    })
}

/// Accepts a string or any scalar (the model sometimes sends prices as numbers).
pub(crate) fn loose_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(d)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
