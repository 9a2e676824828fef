// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory tabular store.
//!
//! Tables are declared with a header row and positional data rows, the same
//! shape a spreadsheet tab has. Appends are mapped onto the header so that a
//! row written by the booking recorder is visible to the next read.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use venuebot_core::traits::adapter::PluginAdapter;
use venuebot_core::traits::store::TabularStore;
use venuebot_core::types::{AdapterType, HealthStatus, Row};
use venuebot_core::VenueError;

#[derive(Debug, Default)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A mock store backed by in-memory tables.
#[derive(Debug, Default)]
pub struct MockStore {
    tables: Mutex<HashMap<String, Table>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fetches: Mutex<HashMap<String, usize>>,
    appends: AtomicUsize,
    read_delay: Mutex<Option<Duration>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table with headers and positional rows (builder form).
    pub fn with_table(self, name: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        self.set_table(name, headers, rows);
        self
    }

    /// Replaces a table's contents, as an operator editing the sheet would.
    pub fn set_table(&self, name: &str, headers: &[&str], rows: &[&[&str]]) {
        let table = Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        self.lock_tables().insert(name.to_string(), table);
    }

    /// Makes every subsequent read fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent append fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delays every read by `delay` (tokio time, so paused clocks apply).
    pub fn set_read_delay(&self, delay: Duration) {
        if let Ok(mut d) = self.read_delay.lock() {
            *d = Some(delay);
        }
    }

    /// Number of reads attempted against `table`, failed ones included.
    pub fn fetch_count(&self, table: &str) -> usize {
        self.fetches
            .lock()
            .map(|f| f.get(table).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of successful appends across all tables.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// Raw positional rows of a table.
    pub fn raw_rows(&self, table: &str) -> Vec<Vec<String>> {
        self.lock_tables()
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<String, Table>> {
        // A panicking test thread must not wedge the rest of the suite.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, VenueError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("reads failing".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl TabularStore for MockStore {
    async fn fetch_rows(&self, table: &str) -> Result<Vec<Row>, VenueError> {
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(table.to_string()).or_default() += 1;
        }

        let delay = self.read_delay.lock().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(VenueError::store(format!("mock read failure on `{table}`")));
        }

        let tables = self.lock_tables();
        let t = tables
            .get(table)
            .ok_or_else(|| VenueError::store(format!("worksheet `{table}` not found")))?;
        Ok(t.rows
            .iter()
            .map(|cells| {
                Row::from_pairs(
                    t.headers
                        .iter()
                        .enumerate()
                        .map(|(i, h)| (h.clone(), cells.get(i).cloned().unwrap_or_default())),
                )
            })
            .filter(|row| !row.is_blank())
            .collect())
    }

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<(), VenueError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VenueError::store(format!("mock write failure on `{table}`")));
        }
        let mut tables = self.lock_tables();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| VenueError::store(format!("worksheet `{table}` not found")))?;
        t.rows.push(values);
        self.appends.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(table, "mock append");
        Ok(())
    }
}
