// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the venuebot assistant.

use thiserror::Error;

/// The primary error type used across all venuebot adapter traits and core operations.
#[derive(Debug, Error)]
pub enum VenueError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Service credential could not be located or parsed.
    #[error("credential error: {0}")]
    Credentials(String),

    /// Backing tabular store errors (network, auth, missing sheet, bad shape).
    #[error("store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Language-model provider errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Front-door errors (bind failure, outbound send failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A tool requested by the model failed or does not exist.
    #[error("tool `{name}` failed: {message}")]
    Tool { name: String, message: String },

    /// Conversation handling errors (tool loop exhausted, empty reply).
    #[error("session error: {0}")]
    Session(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VenueError {
    /// Shorthand for a store error without an underlying source.
    pub fn store(message: impl Into<String>) -> Self {
        VenueError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        VenueError::Provider {
            message: message.into(),
            source: None,
        }
    }
}
