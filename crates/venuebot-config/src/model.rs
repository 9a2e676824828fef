// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the venuebot assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level venuebot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VenueConfig {
    /// Assistant identity and conversation behavior.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Knowledge cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Date parsing conventions and the venue's clock.
    #[serde(default)]
    pub dates: DatesConfig,

    /// Availability checker policy.
    #[serde(default)]
    pub availability: AvailabilityConfig,

    /// Booking recorder settings.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Conversation session bounds.
    #[serde(default)]
    pub session: SessionConfig,

    /// Google Sheets backing store.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Gemini language model settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Webhook and HTTP API gateway.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Persona name substituted for `{agent_name}` in the instruction.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline instruction template. Overridden by `instruction_file` if both set.
    #[serde(default)]
    pub instruction: Option<String>,

    /// Path to a file holding the instruction template.
    #[serde(default)]
    pub instruction_file: Option<String>,

    /// Upper bound on model round-trips per inbound message.
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: usize,

    /// Reply sent when a conversation fails mid-exchange.
    #[serde(default = "default_error_reply")]
    pub error_reply: String,

    /// Reply sent when a conversation cannot be started.
    #[serde(default = "default_startup_error_reply")]
    pub startup_error_reply: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            instruction: None,
            instruction_file: None,
            max_tool_iterations: default_max_tool_iterations(),
            error_reply: default_error_reply(),
            startup_error_reply: default_startup_error_reply(),
        }
    }
}

fn default_agent_name() -> String {
    "Nour".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_tool_iterations() -> usize {
    10
}

fn default_error_reply() -> String {
    "عذرًا، حدث خطأ تقني. يرجى المحاولة مرة أخرى.".to_string()
}

fn default_startup_error_reply() -> String {
    "عذرًا، حدث خطأ أثناء تشغيل النظام.".to_string()
}

/// Knowledge cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum snapshot age in seconds before a refresh is attempted.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Fact keys whose 10-digit values get a leading `0` on read.
    #[serde(default = "default_phone_keys")]
    pub phone_keys: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            phone_keys: default_phone_keys(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_phone_keys() -> Vec<String> {
    vec!["Admin_Phone".to_string()]
}

/// Which field comes first in a date whose year is last (`10/04/2026`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `D-M-YYYY`.
    #[default]
    DayFirst,
    /// `M-D-YYYY`.
    MonthFirst,
}

/// Date parsing and clock configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatesConfig {
    /// Interpretation of year-last dates.
    #[serde(default)]
    pub order: DateOrder,

    /// Offset of the venue's local time from UTC, in minutes. Decides "today".
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            order: DateOrder::default(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

fn default_utc_offset_minutes() -> i32 {
    120
}

/// Availability checker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AvailabilityConfig {
    /// Report `Available` when the bookings table cannot be read.
    /// When false the checker reports `CHECK_FAILED` instead.
    #[serde(default = "default_true")]
    pub open_on_error: bool,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            open_on_error: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Booking recorder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Re-check the slot under the append lock and refuse taken slots.
    #[serde(default)]
    pub reject_conflicts: bool,

    /// Fact key prefix for deposits; the slot name is appended (`Deposit_Night`).
    #[serde(default = "default_deposit_key_prefix")]
    pub deposit_key_prefix: String,

    /// Currency label used in the confirmation text.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Deadline for paying the deposit, in hours.
    #[serde(default = "default_deposit_hours")]
    pub deposit_hours: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            reject_conflicts: false,
            deposit_key_prefix: default_deposit_key_prefix(),
            currency: default_currency(),
            deposit_hours: default_deposit_hours(),
        }
    }
}

fn default_deposit_key_prefix() -> String {
    "Deposit_".to_string()
}

fn default_currency() -> String {
    "EGP".to_string()
}

fn default_deposit_hours() -> u32 {
    48
}

/// Session registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum number of open conversations; the least recently used is dropped.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Conversations idle for longer than this are discarded.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_max_sessions() -> usize {
    1000
}

fn default_idle_timeout_secs() -> u64 {
    6 * 60 * 60
}

/// Google Sheets store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Spreadsheet id. When unset the spreadsheet is looked up by name.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Spreadsheet title resolved through Drive when no id is given.
    #[serde(default = "default_spreadsheet_name")]
    pub spreadsheet_name: String,

    /// Service account key file, used when the environment holds no key.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Sheets API base URL.
    #[serde(default = "default_sheets_api_url")]
    pub api_url: String,

    /// Drive API base URL.
    #[serde(default = "default_drive_api_url")]
    pub drive_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            spreadsheet_name: default_spreadsheet_name(),
            credentials_file: default_credentials_file(),
            api_url: default_sheets_api_url(),
            drive_url: default_drive_api_url(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_spreadsheet_name() -> String {
    "Wedding_Hall_Database".to_string()
}

fn default_credentials_file() -> String {
    "credentials.json".to_string()
}

fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_drive_api_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for every conversation.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    60
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind.
    #[serde(default = "default_bind_address")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Token the webhook platform echoes during subscription verification.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Page access token for the Send API. Unset means replies are only logged.
    #[serde(default)]
    pub page_access_token: Option<String>,

    /// Bearer token guarding `/v1/messages`. Unset leaves the route unmounted.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Graph API base URL used for outbound replies.
    #[serde(default = "default_graph_api_url")]
    pub graph_api_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_bind_address(),
            port: default_port(),
            verify_token: None,
            page_access_token: None,
            bearer_token: None,
            graph_api_url: default_graph_api_url(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_graph_api_url() -> String {
    "https://graph.facebook.com/v21.0".to_string()
}
