// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `venuebot shell` command implementation.
//!
//! A readline chat with the assistant, using the same handler as the
//! gateway. Each invocation is a new customer with a random identity.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use venuebot_agent::InstructionTemplate;
use venuebot_config::VenueConfig;
use venuebot_core::{SessionId, VenueError};

use crate::wiring::{self, Venue};

/// Runs the `venuebot shell` interactive REPL.
pub async fn run_shell(config: VenueConfig) -> Result<(), VenueError> {
    crate::init_tracing(&config.agent.log_level);

    let provider = wiring::connect_provider(&config).inspect_err(|_| {
        eprintln!(
            "error: Gemini API key required. Set gemini.api_key in config or the {} env var",
            venuebot_gemini::API_KEY_ENV
        );
    })?;
    let store = wiring::connect_store(&config)?;
    let venue = Venue::assemble(&config, store, wiring::system_clock(&config)?);
    let instruction = InstructionTemplate::load(&config.agent).await;
    let handler = venue.handler(&config, provider, instruction);

    let identity = SessionId(format!("shell-{}", uuid::Uuid::new_v4()));

    let mut rl = DefaultEditor::new()
        .map_err(|e| VenueError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "venuebot shell".bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let reply = handler.handle(trimmed, &identity).await;
                println!("{} {reply}\n", format!("{}:", config.agent.name).cyan());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}
