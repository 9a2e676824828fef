// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifies a (date, slot) pair against the live bookings table.
//!
//! Bookings are read straight from the store on every check, bypassing the
//! knowledge cache. Stored dates go through the lenient normalizer; the
//! requested date must be strict ISO.

use std::sync::Arc;

use chrono::NaiveDate;
use strum::{AsRefStr, Display};
use tracing::{debug, warn};

use venuebot_config::model::AvailabilityConfig;
use venuebot_core::traits::store::TabularStore;
use venuebot_core::types::{BOOKINGS_TABLE, BookingStatus, Row, Slot};
use venuebot_core::VenueError;
use venuebot_knowledge::{Clock, DateNormalizer, parse_iso};

/// Result of an availability check, rendered to the model by its wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Availability {
    #[strum(serialize = "Available")]
    Available,
    #[strum(serialize = "Booked")]
    Booked,
    #[strum(serialize = "PAST_DATE")]
    PastDate,
    #[strum(serialize = "INVALID_DATE_FORMAT")]
    InvalidDateFormat,
    #[strum(serialize = "INVALID_SLOT")]
    InvalidSlot,
    /// The bookings table could not be read and the checker fails closed.
    #[strum(serialize = "CHECK_FAILED")]
    CheckFailed,
}

/// Checks slots against the bookings table.
pub struct AvailabilityChecker {
    store: Arc<dyn TabularStore>,
    clock: Arc<dyn Clock>,
    normalizer: DateNormalizer,
    open_on_error: bool,
}

impl AvailabilityChecker {
    pub fn new(
        store: Arc<dyn TabularStore>,
        clock: Arc<dyn Clock>,
        normalizer: DateNormalizer,
        config: &AvailabilityConfig,
    ) -> Self {
        Self {
            store,
            clock,
            normalizer,
            open_on_error: config.open_on_error,
        }
    }

    /// Classifies `date_raw` (`YYYY-MM-DD`) and `slot_raw` (`day`/`night`).
    ///
    /// Today is still checkable; only dates strictly before today are past.
    ///
    /// A row blocks the slot when its status is `Booked` or `Pending`, and
    /// also when the status cell is blank, since rows typed into the sheet by
    /// hand often leave it empty. Any other status, such as `Cancelled` or
    /// `Confirmed`, leaves the slot free.
    pub async fn check(&self, date_raw: &str, slot_raw: &str) -> Availability {
        let Some(date) = parse_iso(date_raw) else {
            return Availability::InvalidDateFormat;
        };
        let Ok(slot) = slot_raw.trim().parse::<Slot>() else {
            return Availability::InvalidSlot;
        };
        if date < self.clock.today() {
            return Availability::PastDate;
        }

        match self.is_taken(date, slot).await {
            Ok(true) => Availability::Booked,
            Ok(false) => Availability::Available,
            Err(e) if self.open_on_error => {
                warn!(error = %e, %date, %slot, "bookings unreadable, reporting slot as available");
                Availability::Available
            }
            Err(e) => {
                warn!(error = %e, %date, %slot, "bookings unreadable, availability unknown");
                Availability::CheckFailed
            }
        }
    }

    /// Whether any blocking booking row matches `date` and `slot`.
    ///
    /// Rows whose date or slot cannot be parsed are skipped.
    pub async fn is_taken(&self, date: NaiveDate, slot: Slot) -> Result<bool, VenueError> {
        let rows = self.store.fetch_rows(BOOKINGS_TABLE).await?;
        let hit = rows.iter().find(|row| self.blocks(row, date, slot));
        if let Some(row) = hit {
            debug!(
                %date,
                %slot,
                status = row.get("Status").unwrap_or_default(),
                "slot already taken"
            );
        }
        Ok(hit.is_some())
    }

    fn blocks(&self, row: &Row, date: NaiveDate, slot: Slot) -> bool {
        let same_date = row
            .get("Date")
            .and_then(|d| self.normalizer.normalize(d))
            .is_some_and(|d| d == date);
        let same_slot = row
            .get("Time_Slot")
            .and_then(|s| s.trim().parse::<Slot>().ok())
            .is_some_and(|s| s == slot);
        // A hand-entered row with no status still occupies the slot.
        let blocking = row
            .text("Status")
            .is_none_or(|s| BookingStatus::parse(&s).is_blocking());
        same_date && same_slot && blocking
    }
}
