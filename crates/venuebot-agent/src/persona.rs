// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assistant's instruction template.
//!
//! Loaded once at startup from `agent.instruction_file`, then
//! `agent.instruction`, then [`DEFAULT_INSTRUCTION`]. Placeholders
//! `{agent_name}`, `{today}`, `{knowledge_base}` and `{admin_phone}` are
//! filled in each time a conversation starts.

use chrono::NaiveDate;
use tracing::{info, warn};

use venuebot_config::model::AgentConfig;

/// Instruction used when none is configured.
pub const DEFAULT_INSTRUCTION: &str = r#"You are '{agent_name}', the sales assistant for the wedding hall.
Current date: {today}.

KNOWLEDGE BASE:
{knowledge_base}

STRICT RULES:

1. UNKNOWN INFO:
   - If the client asks about something that is not in the knowledge base, do not guess.
   - Say: "For this specific detail, please contact the administration directly: {admin_phone}".

2. CAPACITY LIMIT:
   - Maximum capacity is 400 guests.
   - For more than 400 guests do not proceed with a booking.
   - Say: "Our hall capacity is 400. For larger numbers, please contact the administration: {admin_phone}".

3. DATA VALIDATION (before booking):
   - Name: must be a full name in three parts. Ask again for a single name.
   - Phone: must be a valid Egyptian mobile number (11 digits starting with 010, 011, 012 or 015).

4. BOOKING PROCESS:
   - Step A: confirm the date, the time slot (Day/Night) and the package. Use check_availability.
   - Step B: offer extras (buffet upgrades, zaffa, meals).
   - Step C: calculate the total price (package plus extras).
   - Step D: summarize the deal and the total price and ask the client to confirm.
   - Step E: only after an explicit confirmation, call book_date.

5. TONE: professional, polite, Egyptian Arabic.
"#;

/// Values substituted into the template.
#[derive(Debug, Clone, Copy)]
pub struct PersonaVars<'a> {
    pub agent_name: &'a str,
    pub today: NaiveDate,
    pub knowledge_base: &'a str,
    pub admin_phone: &'a str,
}

/// The loaded template text.
#[derive(Debug, Clone)]
pub struct InstructionTemplate {
    template: String,
}

impl InstructionTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Loads the template following config priority: file > inline > default.
    ///
    /// An unreadable or empty file is logged and skipped.
    pub async fn load(config: &AgentConfig) -> Self {
        if let Some(ref path) = config.instruction_file {
            match tokio::fs::read_to_string(path).await {
                Ok(content) if !content.trim().is_empty() => {
                    info!(path = path.as_str(), "loaded instruction from file");
                    return Self::new(content.trim());
                }
                Ok(_) => warn!(path = path.as_str(), "instruction file is empty, falling back"),
                Err(e) => warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to read instruction file, falling back"
                ),
            }
        }

        if let Some(ref inline) = config.instruction
            && !inline.trim().is_empty()
        {
            return Self::new(inline.as_str());
        }

        Self::new(DEFAULT_INSTRUCTION)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fills in the placeholders in a single pass. Substituted text is not
    /// rescanned, so braces inside the knowledge base stay literal, as do
    /// unknown `{names}`.
    pub fn render(&self, vars: &PersonaVars<'_>) -> String {
        let today = vars.today.format("%Y-%m-%d").to_string();
        let mut out = String::with_capacity(self.template.len() + vars.knowledge_base.len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let value = tail.find('}').and_then(|end| {
                let value = match &tail[1..end] {
                    "agent_name" => vars.agent_name,
                    "today" => today.as_str(),
                    "knowledge_base" => vars.knowledge_base,
                    "admin_phone" => vars.admin_phone,
                    _ => return None,
                };
                Some((value, end))
            });
            match value {
                Some((value, end)) => {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
