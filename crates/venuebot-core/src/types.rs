// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared by the knowledge cache, the booking rules and the
//! store adapters.
//!
//! Store rows arrive as loosely-typed [`Row`]s (header name -> cell text).
//! The typed records below are built from rows and never fail: a missing or
//! empty cell becomes `None` and the renderer decides how to show it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Worksheet holding `Key`/`Value` facts.
pub const FACTS_TABLE: &str = "General_Info";
/// Worksheet holding pricing packages.
pub const PACKAGES_TABLE: &str = "Packages";
/// Worksheet holding buffet upgrade levels.
pub const BUFFET_TABLE: &str = "Buffet_Options";
/// Worksheet holding add-on items.
pub const EXTRAS_TABLE: &str = "Extras";
/// Worksheet holding booking rows.
pub const BOOKINGS_TABLE: &str = "Bookings";

/// Column order of the bookings table. Appends are positional in this order.
pub const BOOKING_COLUMNS: [&str; 9] = [
    "Date",
    "Time_Slot",
    "Status",
    "Client_Name",
    "Phone",
    "Package_Interest",
    "Total_Price",
    "Details",
    "Timestamp",
];

/// Identity of a conversation (sender id, phone number, or generated UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Provider,
    Channel,
}

/// One data row of a table, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Sets a cell value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Raw cell text, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Trimmed cell text, treating a missing column and a blank cell alike.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// True when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// A key/value fact (admin phone, deposit amounts, opening hours, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub key: String,
    pub value: String,
}

impl Fact {
    /// Builds a fact from a `Key`/`Value` row. Rows without a key are dropped.
    pub fn from_row(row: &Row) -> Option<Self> {
        let key = row.text("Key")?;
        Some(Self {
            key,
            value: row.get("Value").map(|v| v.trim().to_string()).unwrap_or_default(),
        })
    }
}

/// A pricing package offered by the venue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub season: Option<String>,
    pub guests: Option<String>,
    pub price: Option<String>,
    pub details: Option<String>,
    pub display_tier: Option<String>,
    pub image_url: Option<String>,
}

impl PackageRecord {
    /// Tier used when the sheet leaves `Display_Tier` empty.
    pub const DEFAULT_TIER: &'static str = "Primary";

    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("Package_ID"),
            name: row.text("Name_Arabic"),
            season: row.text("Season"),
            guests: row.text("Guests"),
            price: row.text("Price"),
            details: row.text("Details"),
            display_tier: row.text("Display_Tier"),
            image_url: row.text("Image_URL"),
        }
    }

    /// Display tier, defaulting to [`Self::DEFAULT_TIER`].
    pub fn tier(&self) -> &str {
        self.display_tier.as_deref().unwrap_or(Self::DEFAULT_TIER)
    }
}

/// A buffet upgrade level attached to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuffetTier {
    pub package_id: Option<String>,
    pub level_name: Option<String>,
    pub price: Option<String>,
    pub items: Option<String>,
}

impl BuffetTier {
    pub fn from_row(row: &Row) -> Self {
        Self {
            package_id: row.text("Package_ID"),
            level_name: row.text("Level_Name"),
            price: row.text("Price"),
            items: row.text("Items"),
        }
    }
}

/// An add-on item (zaffa, extra meals, decorations).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
}

impl ExtraItem {
    pub fn from_row(row: &Row) -> Self {
        Self {
            name: row.text("Item_Name"),
            category: row.text("Category"),
            price: row.text("Price"),
        }
    }
}

/// One of the two bookable periods of a calendar date.
///
/// Parsing ignores ASCII case but not surrounding whitespace; trim first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Slot {
    Day,
    Night,
}

/// Lifecycle status of a booking row. Transitions happen by hand in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Booked,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    /// Parses the status cell case-insensitively; unknown text is kept.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("pending") {
            BookingStatus::Pending
        } else if s.eq_ignore_ascii_case("booked") {
            BookingStatus::Booked
        } else if s.eq_ignore_ascii_case("cancelled") || s.eq_ignore_ascii_case("canceled") {
            BookingStatus::Cancelled
        } else {
            BookingStatus::Other(s.to_string())
        }
    }

    /// Whether a row with this status occupies its slot.
    pub fn is_blocking(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Booked)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => f.write_str("Pending"),
            BookingStatus::Booked => f.write_str("Booked"),
            BookingStatus::Cancelled => f.write_str("Cancelled"),
            BookingStatus::Other(s) => f.write_str(s),
        }
    }
}

/// A booking row as written by the booking recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub date: chrono::NaiveDate,
    pub slot: Slot,
    pub status: BookingStatus,
    pub client_name: String,
    pub phone: String,
    pub package: String,
    pub total_price: Option<String>,
    pub details: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl BookingRecord {
    /// Cell values in [`BOOKING_COLUMNS`] order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.slot.to_string(),
            self.status.to_string(),
            self.client_name.clone(),
            self.phone.clone(),
            self.package.clone(),
            self.total_price.clone().unwrap_or_default(),
            self.details.clone().unwrap_or_default(),
            self.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}
