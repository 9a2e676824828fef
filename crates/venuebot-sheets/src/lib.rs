// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Sheets adapter for the venuebot tabular store.
//!
//! Provides [`SheetsStore`] (values read/append, Drive name lookup),
//! service account credential loading, and RS256 token minting.

pub mod credentials;
pub mod store;
pub mod token;

use std::path::Path;
use std::sync::Arc;

use venuebot_config::model::SheetsConfig;
use venuebot_core::VenueError;

pub use credentials::{CREDENTIALS_ENV, ServiceAccountKey, load_service_account};
pub use store::SheetsStore;
pub use token::{ServiceAccountTokens, StaticToken, TokenSource};

/// Loads the service account and builds a store that authenticates with it.
///
/// `credentials_env` is the value of [`CREDENTIALS_ENV`], if set.
pub fn connect(
    config: &SheetsConfig,
    credentials_env: Option<&str>,
) -> Result<SheetsStore, VenueError> {
    let key = load_service_account(credentials_env, Path::new(&config.credentials_file))?;
    let http = store::http_client(config)?;
    let tokens = Arc::new(ServiceAccountTokens::new(http.clone(), &key)?);
    SheetsStore::with_client(config, tokens, http)
}
