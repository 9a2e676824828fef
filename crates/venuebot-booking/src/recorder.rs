// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appends confirmed bookings to the bookings table.
//!
//! Recording is not idempotent: two identical requests append two rows.
//! Appends for one (date, slot) are serialized; with `reject_conflicts`
//! the slot is re-checked under that lock before writing.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use venuebot_config::model::BookingConfig;
use venuebot_core::traits::store::TabularStore;
use venuebot_core::types::{BOOKINGS_TABLE, BookingRecord, BookingStatus, Slot};
use venuebot_knowledge::{Clock, KnowledgeCache, parse_iso};

use crate::availability::AvailabilityChecker;

/// A booking the client has confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `Day` or `Night`, any case.
    pub slot: String,
    pub client_name: String,
    pub phone: String,
    pub package: String,
    pub total_price: Option<String>,
    pub details: Option<String>,
}

/// What happened to a booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Row appended; `deposit` is the fact value for the slot's deposit.
    Success { deposit: String },
    /// The date is today or earlier.
    PastDateError,
    InvalidDateFormat,
    InvalidSlot,
    /// A blocking booking already holds the slot (only with `reject_conflicts`).
    SlotTaken,
    /// The store could not be written (or read, for the conflict check).
    SystemError,
}

/// Writes bookings and derives the deposit owed.
pub struct BookingRecorder {
    store: Arc<dyn TabularStore>,
    knowledge: Arc<KnowledgeCache>,
    checker: Arc<AvailabilityChecker>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
    slot_locks: DashMap<(NaiveDate, Slot), Arc<Mutex<()>>>,
}

impl BookingRecorder {
    pub fn new(
        store: Arc<dyn TabularStore>,
        knowledge: Arc<KnowledgeCache>,
        checker: Arc<AvailabilityChecker>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self {
            store,
            knowledge,
            checker,
            clock,
            config,
            slot_locks: DashMap::new(),
        }
    }

    /// Validates and appends one booking row with status `Pending`.
    ///
    /// Unlike the availability check, today is rejected: a booking must be
    /// strictly in the future.
    pub async fn record(&self, request: &BookingRequest) -> BookingOutcome {
        let Some(date) = parse_iso(&request.date) else {
            return BookingOutcome::InvalidDateFormat;
        };
        let Ok(slot) = request.slot.trim().parse::<Slot>() else {
            return BookingOutcome::InvalidSlot;
        };
        if date <= self.clock.today() {
            return BookingOutcome::PastDateError;
        }

        let key = (date, slot);
        let lock = self
            .slot_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let outcome = {
            let _guard = lock.lock().await;
            self.record_locked(date, slot, request).await
        };

        // The map's own reference is the last one once no caller waits on it.
        drop(lock);
        self.slot_locks
            .remove_if(&key, |_, held| Arc::strong_count(held) == 1);

        match outcome {
            Ok(()) => {
                let deposit = self.deposit_for(slot).await;
                BookingOutcome::Success { deposit }
            }
            Err(outcome) => outcome,
        }
    }

    /// Number of (date, slot) locks currently held or awaited.
    pub fn locked_slots(&self) -> usize {
        self.slot_locks.len()
    }

    async fn record_locked(
        &self,
        date: NaiveDate,
        slot: Slot,
        request: &BookingRequest,
    ) -> Result<(), BookingOutcome> {
        if self.config.reject_conflicts {
            match self.checker.is_taken(date, slot).await {
                Ok(false) => {}
                Ok(true) => {
                    info!(%date, %slot, "booking refused, slot already taken");
                    return Err(BookingOutcome::SlotTaken);
                }
                Err(e) => {
                    error!(error = %e, %date, %slot, "conflict check failed");
                    return Err(BookingOutcome::SystemError);
                }
            }
        }

        let record = BookingRecord {
            date,
            slot,
            status: BookingStatus::Pending,
            client_name: request.client_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            package: request.package.trim().to_string(),
            total_price: request.total_price.clone(),
            details: request.details.clone(),
            created_at: self.clock.now(),
        };

        if let Err(e) = self.store.append_row(BOOKINGS_TABLE, record.to_cells()).await {
            error!(error = %e, %date, %slot, "booking append failed");
            return Err(BookingOutcome::SystemError);
        }
        info!(%date, %slot, package = %record.package, "booking recorded");
        Ok(())
    }

    /// Deposit fact for a slot, e.g. `Deposit_Night`.
    pub async fn deposit_for(&self, slot: Slot) -> String {
        let key = format!("{}{slot}", self.config.deposit_key_prefix);
        let deposit = self.knowledge.fact(&key).await;
        if deposit == venuebot_knowledge::NOT_FOUND {
            warn!(key, "deposit fact missing");
        }
        deposit
    }

    /// Text returned to the model for an outcome.
    pub fn reply(&self, outcome: &BookingOutcome, total_price: &str) -> String {
        match outcome {
            BookingOutcome::Success { deposit } => format!(
                "SUCCESS: Booking recorded. Total Deal: {total_price}. Deposit Required: {deposit} {} within {} hours.",
                self.config.currency, self.config.deposit_hours
            ),
            BookingOutcome::PastDateError => {
                "Booking Failed. PAST_DATE: the date must be after today.".to_string()
            }
            BookingOutcome::InvalidDateFormat => {
                "Booking Failed. INVALID_DATE_FORMAT: use YYYY-MM-DD.".to_string()
            }
            BookingOutcome::InvalidSlot => {
                "Booking Failed. INVALID_SLOT: use Day or Night.".to_string()
            }
            BookingOutcome::SlotTaken => {
                "Booking Failed. SLOT_TAKEN: this date and time slot are already booked."
                    .to_string()
            }
            BookingOutcome::SystemError => "Booking Failed. System Error.".to_string(),
        }
    }
}
