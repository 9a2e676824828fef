// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use venuebot_booking::AvailabilityChecker;
use venuebot_core::VenueError;

use crate::tool::{Tool, ToolOutput};
use crate::tools::parse_args;

#[derive(Deserialize)]
struct Args {
    date_str: String,
    time_slot: String,
}

/// Checks whether a date and slot are free.
pub struct CheckAvailabilityTool {
    checker: Arc<AvailabilityChecker>,
}

impl CheckAvailabilityTool {
    pub fn new(checker: Arc<AvailabilityChecker>) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl Tool for CheckAvailabilityTool {
    fn name(&self) -> &str {
        "check_availability"
    }

    fn description(&self) -> &str {
        "Check whether the hall is free on a date and time slot. Returns Available, Booked, PAST_DATE, INVALID_DATE_FORMAT, INVALID_SLOT or CHECK_FAILED."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "date_str": {"type": "string", "description": "Date as YYYY-MM-DD"},
                "time_slot": {"type": "string", "enum": ["Day", "Night"]}
            },
            "required": ["date_str", "time_slot"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, VenueError> {
        let args: Args = match parse_args(self.name(), input) {
            Ok(args) => args,
            Err(out) => return Ok(out),
        };
        let result = self.checker.check(&args.date_str, &args.time_slot).await;
        Ok(ToolOutput::text(result.to_string()))
    }
}
