// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venue knowledge: lenient date parsing and the spreadsheet-backed cache
//! of packages, buffet tiers, add-ons and facts.

pub mod cache;
pub mod clock;
pub mod dates;
pub mod facts;
pub mod render;

pub use cache::{KnowledgeCache, Snapshot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{DateNormalizer, parse_iso};
pub use facts::{NOT_FOUND, PhoneFixup};
