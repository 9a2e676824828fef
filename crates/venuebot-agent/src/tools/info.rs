// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use venuebot_core::VenueError;
use venuebot_knowledge::KnowledgeCache;

use crate::tool::{Tool, ToolOutput};
use crate::tools::parse_args;

#[derive(Deserialize)]
struct Args {
    key: String,
}

/// Looks up one fact (admin phone, deposits, ...) from the knowledge cache.
pub struct GeneralInfoTool {
    knowledge: Arc<KnowledgeCache>,
}

impl GeneralInfoTool {
    pub fn new(knowledge: Arc<KnowledgeCache>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Tool for GeneralInfoTool {
    fn name(&self) -> &str {
        "get_general_info"
    }

    fn description(&self) -> &str {
        "Look up a general fact by key, for example Admin_Phone or Deposit_Night. Returns \"Not Found\" for unknown keys."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "key": {"type": "string", "description": "Fact key from the General Info sheet"}
            },
            "required": ["key"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, VenueError> {
        let args: Args = match parse_args(self.name(), input) {
            Ok(args) => args,
            Err(out) => return Ok(out),
        };
        Ok(ToolOutput::text(self.knowledge.fact(args.key.trim()).await))
    }
}
