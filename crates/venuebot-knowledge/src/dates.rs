// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient date normalization for dates typed by people into a spreadsheet.
//!
//! Booking rows carry dates in whatever shape the operator typed:
//! `2026-04-10`, `10/04/2026`, `10.4.2026`, `2026\4\10`, sometimes with a
//! time appended by the spreadsheet. Every stored date goes through
//! [`DateNormalizer::normalize`] before it is compared; raw strings are
//! never compared directly.

use chrono::NaiveDate;
use venuebot_config::DateOrder;

const SEPARATORS: [char; 3] = ['/', '.', '\\'];

/// Parses heterogeneous date text into a calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateNormalizer {
    order: DateOrder,
}

impl DateNormalizer {
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    /// Returns `None` for anything that is not a valid calendar date.
    ///
    /// A four-digit first part means year-first (`Y-M-D`). Otherwise a
    /// four-digit last part means year-last, read as `D-M-Y` or `M-D-Y`
    /// depending on the configured order.
    pub fn normalize(&self, raw: &str) -> Option<NaiveDate> {
        let date_text = strip_time(raw.trim())?;
        let unified: String = date_text
            .chars()
            .map(|c| if SEPARATORS.contains(&c) { '-' } else { c })
            .collect();

        let parts: Vec<&str> = unified.split('-').collect();
        let [first, middle, last] = parts.as_slice() else {
            return None;
        };
        if !parts.iter().all(|p| is_digits(p)) {
            return None;
        }

        let (year, month, day) = if first.len() == 4 {
            (*first, *middle, *last)
        } else if last.len() == 4 {
            match self.order {
                DateOrder::DayFirst => (*last, *middle, *first),
                DateOrder::MonthFirst => (*last, *first, *middle),
            }
        } else {
            return None;
        };

        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
    }
}

/// Strict `YYYY-M-D` parsing for dates the model sends to tools.
///
/// The year must have four digits, month and day one or two, and the only
/// accepted separator is `-`. Surrounding whitespace is ignored.
pub fn parse_iso(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let widths_ok =
        year.len() == 4 && (1..=2).contains(&month.len()) && (1..=2).contains(&day.len());
    if !widths_ok || ![year, month, day].iter().all(|p| is_digits(p)) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Drops a trailing time component (`2026-04-10 00:00:00`, `10/4/2026 9:30 PM`).
///
/// Text after the first whitespace is only discarded when it looks like a
/// time; anything else makes the value unparseable.
fn strip_time(s: &str) -> Option<&str> {
    match s.split_once(char::is_whitespace) {
        None => Some(s),
        Some((date, rest)) if rest.contains(':') => Some(date),
        Some(_) => None,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
