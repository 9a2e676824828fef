// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall clock in the venue's local time.
//!
//! "Today" decides whether a date is in the past, so every component asks an
//! injected [`Clock`] instead of reading the system time directly.

use std::sync::Mutex;

use chrono::{Days, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use venuebot_config::model::DatesConfig;
use venuebot_core::VenueError;

/// Source of the venue's local date and time.
pub trait Clock: Send + Sync + 'static {
    /// Current local date and time at the venue.
    fn now(&self) -> NaiveDateTime;

    /// Current local date at the venue.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// System time shifted to a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(utc_offset_minutes: i32) -> Result<Self, VenueError> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            VenueError::Config(format!(
                "dates.utc_offset_minutes {utc_offset_minutes} is out of range"
            ))
        })?;
        Ok(Self { offset })
    }

    pub fn from_config(config: &DatesConfig) -> Result<Self, VenueError> {
        Self::new(config.utc_offset_minutes)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// A settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// A clock standing at noon on `date`.
    pub fn at_noon(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN) + chrono::Duration::hours(12))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Moves the clock forward by whole days.
    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = now.checked_add_days(Days::new(days)) {
            *now = next;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
