// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use venuebot_booking::{BookingRecorder, BookingRequest};
use venuebot_core::VenueError;

use crate::tool::{Tool, ToolOutput};
use crate::tools::{loose_text, parse_args};

#[derive(Deserialize)]
struct Args {
    date_str: String,
    time_slot: String,
    name: String,
    #[serde(deserialize_with = "loose_text")]
    phone: Option<String>,
    package_name: String,
    #[serde(default, deserialize_with = "loose_text")]
    total_price: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    details_summary: Option<String>,
}

/// Records a confirmed booking.
pub struct BookDateTool {
    recorder: Arc<BookingRecorder>,
}

impl BookDateTool {
    pub fn new(recorder: Arc<BookingRecorder>) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl Tool for BookDateTool {
    fn name(&self) -> &str {
        "book_date"
    }

    fn description(&self) -> &str {
        "Record a booking after the client has confirmed the summary and total price. The date must be after today."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "date_str": {"type": "string", "description": "Date as YYYY-MM-DD"},
                "time_slot": {"type": "string", "enum": ["Day", "Night"]},
                "name": {"type": "string", "description": "Client's full name"},
                "phone": {"type": "string", "description": "Client's mobile number"},
                "package_name": {"type": "string"},
                "total_price": {"type": "string", "description": "Agreed total including extras"},
                "details_summary": {"type": "string", "description": "Chosen extras and notes"}
            },
            "required": ["date_str", "time_slot", "name", "phone", "package_name", "total_price"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, VenueError> {
        let args: Args = match parse_args(self.name(), input) {
            Ok(args) => args,
            Err(out) => return Ok(out),
        };
        let Some(phone) = args.phone.filter(|p| !p.trim().is_empty()) else {
            return Ok(ToolOutput::error("invalid arguments for book_date: phone is required"));
        };

        let total = args.total_price.clone().unwrap_or_else(|| "N/A".to_string());
        let request = BookingRequest {
            date: args.date_str,
            slot: args.time_slot,
            client_name: args.name,
            phone,
            package: args.package_name,
            total_price: args.total_price,
            details: args.details_summary,
        };
        let outcome = self.recorder.record(&request).await;
        Ok(ToolOutput::text(self.recorder.reply(&outcome, &total)))
    }
}
