// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::VenueConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest UTC offset chrono's `FixedOffset` accepts, in minutes (exclusive).
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error
/// (does not fail fast).
pub fn validate_config(config: &VenueConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::validation("agent.name must not be empty"));
    }

    let level = config.agent.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.agent.max_tool_iterations == 0 {
        errors.push(ConfigError::validation(
            "agent.max_tool_iterations must be at least 1",
        ));
    }

    if config.cache.phone_keys.iter().any(|k| k.trim().is_empty()) {
        errors.push(ConfigError::validation(
            "cache.phone_keys must not contain empty keys",
        ));
    }

    if config.dates.utc_offset_minutes.abs() >= MAX_UTC_OFFSET_MINUTES {
        errors.push(ConfigError::validation(format!(
            "dates.utc_offset_minutes must be within ±{}, got {}",
            MAX_UTC_OFFSET_MINUTES - 1,
            config.dates.utc_offset_minutes
        )));
    }

    if config.booking.deposit_key_prefix.trim().is_empty() {
        errors.push(ConfigError::validation(
            "booking.deposit_key_prefix must not be empty",
        ));
    }

    if config.session.max_sessions == 0 {
        errors.push(ConfigError::validation(
            "session.max_sessions must be at least 1",
        ));
    }

    if config.session.idle_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "session.idle_timeout_secs must be at least 1",
        ));
    }

    let has_id = config
        .sheets
        .spreadsheet_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    if !has_id && config.sheets.spreadsheet_name.trim().is_empty() {
        errors.push(ConfigError::validation(
            "one of sheets.spreadsheet_id or sheets.spreadsheet_name must be set",
        ));
    }

    for (key, url) in [
        ("sheets.api_url", &config.sheets.api_url),
        ("sheets.drive_url", &config.sheets.drive_url),
        ("gemini.base_url", &config.gemini.base_url),
        ("gateway.graph_api_url", &config.gateway.graph_api_url),
    ] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(ConfigError::validation(format!(
                "{key} `{url}` must be an http(s) URL"
            )));
        }
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::validation("gemini.model must not be empty"));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
