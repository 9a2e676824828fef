// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Availability checks and booking records against the bookings table.

pub mod availability;
pub mod recorder;

pub use availability::{Availability, AvailabilityChecker};
pub use recorder::{BookingOutcome, BookingRecorder, BookingRequest};
