// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-time fix-up for phone numbers stored as numbers.
//!
//! Spreadsheets drop the leading zero of `01001234567` when the cell is
//! numeric. Values under a phone key that are exactly ten ASCII digits get
//! the zero back; the stored value is never changed.

use venuebot_config::model::CacheConfig;

/// Sentinel returned for fact keys that do not exist.
pub const NOT_FOUND: &str = "Not Found";

const STRIPPED_PHONE_LEN: usize = 10;

/// Which fact keys hold phone numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneFixup {
    keys: Vec<String>,
}

impl PhoneFixup {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.phone_keys.clone())
    }

    /// The value as it should be shown for `key`.
    pub fn apply(&self, key: &str, value: &str) -> String {
        let is_phone_key = self.keys.iter().any(|k| k == key);
        if is_phone_key
            && value.len() == STRIPPED_PHONE_LEN
            && value.bytes().all(|b| b.is_ascii_digit())
        {
            format!("0{value}")
        } else {
            value.to_string()
        }
    }
}

impl Default for PhoneFixup {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
