// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tabular store trait for the spreadsheet acting as knowledge base and
//! booking ledger.

use async_trait::async_trait;

use crate::error::VenueError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Row;

/// Adapter for a spreadsheet-like backing store made of named tables.
///
/// Each table has a header row; data rows are exposed as [`Row`]s keyed by
/// header name. Blank rows are skipped and short rows are padded with empty
/// cells.
#[async_trait]
pub trait TabularStore: PluginAdapter {
    /// Fetches every data row of a table ("get all records").
    async fn fetch_rows(&self, table: &str) -> Result<Vec<Row>, VenueError>;

    /// Appends one row. Values are positional in the table's column order.
    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<(), VenueError>;
}
