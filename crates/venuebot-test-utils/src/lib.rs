// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for venuebot integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! a spreadsheet or a language model.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory tables with failure injection and call counting
//! - [`MockProvider`] - Scripted model responses with request capture

pub mod mock_provider;
pub mod mock_store;

pub use mock_provider::MockProvider;
pub use mock_store::MockStore;
