// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./venuebot.toml` > `~/.config/venuebot/venuebot.toml` >
//! `/etc/venuebot/venuebot.toml` with environment variable overrides via `VENUEBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VenueConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/venuebot/venuebot.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "venuebot.toml";

/// Prefix-stripped name of the credential variable, which is not a config key.
const CREDENTIALS_ENV_KEY: &str = "gcp_service_account";

/// Section names recognised in `VENUEBOT_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "cache",
    "dates",
    "availability",
    "booking",
    "session",
    "sheets",
    "gemini",
    "gateway",
];

/// Path of the per-user configuration file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("venuebot").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/venuebot/venuebot.toml` (system-wide)
/// 3. `~/.config/venuebot/venuebot.toml` (user XDG config)
/// 4. `./venuebot.toml` (local directory)
/// 5. `VENUEBOT_*` environment variables
pub fn load_config() -> Result<VenueConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VenueConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VenueConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VenueConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VenueConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(VenueConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_FILE)).merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `VENUEBOT_GATEWAY_PAGE_ACCESS_TOKEN` must become
/// `gateway.page_access_token`.
/// `VENUEBOT_GCP_SERVICE_ACCOUNT` carries the store credential and is read
/// separately, so it is filtered out here.
pub fn env_provider() -> Env {
    Env::prefixed("VENUEBOT_")
        .filter(|key| !key.as_str().eq_ignore_ascii_case(CREDENTIALS_ENV_KEY))
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env key to a dotted config path.
///
/// Only the leading section is split off; unknown sections pass through
/// untouched so `deny_unknown_fields` reports them.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            .filter(|r| !r.is_empty())
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
