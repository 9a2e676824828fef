// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venuebot - a sales assistant for an event venue.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod inspect;
mod serve;
mod shell;
mod wiring;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use venuebot_config::VenueConfig;

/// Venuebot - a sales assistant for an event venue.
#[derive(Parser, Debug)]
#[command(name = "venuebot", version, about, long_about = None)]
struct Cli {
    /// Explicit config file; skips the standard search locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway.
    Serve,
    /// Chat with the assistant in the terminal.
    Shell,
    /// Print the knowledge block the assistant is briefed with.
    Knowledge,
    /// Check whether a date and slot are free.
    Check {
        /// Date in any accepted format, e.g. 10/04/2026 or 2026-04-10.
        date: String,
        /// `day` or `night`.
        #[arg(default_value = "night")]
        slot: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => venuebot_config::load_and_validate_path(path),
        None => venuebot_config::load_and_validate(),
    };
    let config: VenueConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            venuebot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Knowledge) => inspect::run_knowledge(config).await,
        Some(Commands::Check { date, slot }) => inspect::run_check(config, &date, &slot).await,
        None => {
            println!("venuebot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` wins over the configured level when set.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("venuebot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
