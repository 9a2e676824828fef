// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the venuebot assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! record types used throughout the workspace. Store and provider adapters
//! implement traits defined here.

pub mod chat;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VenueError;
pub use types::{
    AdapterType, BookingRecord, BookingStatus, BuffetTier, ExtraItem, Fact, HealthStatus,
    PackageRecord, Row, SessionId, Slot, BOOKING_COLUMNS, BOOKINGS_TABLE, BUFFET_TABLE,
    EXTRAS_TABLE, FACTS_TABLE, PACKAGES_TABLE,
};

pub use traits::{ChatProvider, PluginAdapter, TabularStore};
