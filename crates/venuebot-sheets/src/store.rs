// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`TabularStore`] backed by a Google spreadsheet, one worksheet per table.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use venuebot_config::model::SheetsConfig;
use venuebot_core::traits::adapter::PluginAdapter;
use venuebot_core::traits::store::TabularStore;
use venuebot_core::types::{AdapterType, HealthStatus, Row};
use venuebot_core::VenueError;

use crate::token::{TokenSource, bearer};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

/// Google Sheets store.
///
/// The spreadsheet is addressed by id when configured; otherwise it is looked
/// up by title through Drive on first use and the id is remembered.
pub struct SheetsStore {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    api_url: Url,
    drive_url: Url,
    spreadsheet_name: String,
    spreadsheet_id: OnceCell<String>,
}

impl SheetsStore {
    pub fn new(config: &SheetsConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, VenueError> {
        let http = http_client(config)?;
        Self::with_client(config, tokens, http)
    }

    /// Builds the store around an existing HTTP client (shared with the token source).
    pub fn with_client(
        config: &SheetsConfig,
        tokens: Arc<dyn TokenSource>,
        http: reqwest::Client,
    ) -> Result<Self, VenueError> {
        let spreadsheet_id = match config.spreadsheet_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => OnceCell::new_with(Some(id.to_string())),
            _ => OnceCell::new(),
        };
        Ok(Self {
            http,
            tokens,
            api_url: parse_base(&config.api_url, "sheets.api_url")?,
            drive_url: parse_base(&config.drive_url, "sheets.drive_url")?,
            spreadsheet_name: config.spreadsheet_name.clone(),
            spreadsheet_id,
        })
    }

    /// The spreadsheet id, resolving it by name on first call.
    pub async fn spreadsheet_id(&self) -> Result<&str, VenueError> {
        self.spreadsheet_id
            .get_or_try_init(|| self.resolve_by_name())
            .await
            .map(String::as_str)
    }

    async fn resolve_by_name(&self) -> Result<String, VenueError> {
        let escaped = self.spreadsheet_name.replace('\\', "\\\\").replace('\'', "\\'");
        let mut url = self.drive_url.clone();
        extend_path(&mut url, &["drive", "v3", "files"])?;
        url.query_pairs_mut()
            .append_pair(
                "q",
                &format!("name = '{escaped}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false"),
            )
            .append_pair("fields", "files(id,name)")
            .append_pair("pageSize", "10");

        let list: FileList = self.get_json(url).await?;
        let mut files = list.files.into_iter();
        let first = files.next().ok_or_else(|| {
            VenueError::store(format!(
                "spreadsheet `{}` not found or not shared with the service account",
                self.spreadsheet_name
            ))
        })?;
        if files.next().is_some() {
            warn!(name = %self.spreadsheet_name, "several spreadsheets share this name, using the first");
        }
        info!(name = %first.name, id = %first.id, "resolved spreadsheet");
        Ok(first.id)
    }

    async fn values_url(&self, table: &str, suffix: &str) -> Result<Url, VenueError> {
        let id = self.spreadsheet_id().await?;
        let mut url = self.api_url.clone();
        extend_path(
            &mut url,
            &["v4", "spreadsheets", id, "values", &format!("{table}{suffix}")],
        )?;
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, VenueError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, bearer(&token))
            .send()
            .await
            .map_err(request_failed)?;
        let response = check_status(response).await?;
        response.json().await.map_err(|e| VenueError::Store {
            message: format!("malformed API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl PluginAdapter for SheetsStore {
    fn name(&self) -> &str {
        "google-sheets"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, VenueError> {
        if let Err(e) = self.tokens.access_token().await {
            return Ok(HealthStatus::Unhealthy(format!("no access token: {e}")));
        }
        match self.spreadsheet_id().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }
}

#[async_trait]
impl TabularStore for SheetsStore {
    async fn fetch_rows(&self, table: &str) -> Result<Vec<Row>, VenueError> {
        let url = self.values_url(table, "").await?;
        let range: ValueRange = self.get_json(url).await?;
        let rows = rows_from_values(range.values);
        debug!(table, rows = rows.len(), "fetched worksheet");
        Ok(rows)
    }

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<(), VenueError> {
        let mut url = self.values_url(table, ":append").await?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, bearer(&token))
            .json(&serde_json::json!({ "values": [values] }))
            .send()
            .await
            .map_err(request_failed)?;
        check_status(response).await?;
        debug!(table, "appended row");
        Ok(())
    }
}

/// Turns a worksheet's value grid into header-keyed rows.
///
/// The first row is the header. Short rows are padded with empty cells,
/// columns with a blank header are ignored and blank rows are skipped.
pub fn rows_from_values(values: Vec<Vec<serde_json::Value>>) -> Vec<Row> {
    let mut grid = values.into_iter();
    let Some(header) = grid.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.iter().map(|h| cell_text(h).trim().to_string()).collect();

    grid.map(|cells| {
        Row::from_pairs(
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.is_empty())
                .map(|(i, h)| (h.clone(), cells.get(i).map(cell_text).unwrap_or_default())),
        )
    })
    .filter(|row| !row.is_blank())
    .collect()
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn http_client(config: &SheetsConfig) -> Result<reqwest::Client, VenueError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| VenueError::Store {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })
}

fn parse_base(raw: &str, key: &str) -> Result<Url, VenueError> {
    Url::parse(raw).map_err(|e| VenueError::Config(format!("{key} `{raw}` is not a URL: {e}")))
}

fn extend_path(url: &mut Url, segments: &[&str]) -> Result<(), VenueError> {
    let rendered = url.to_string();
    url.path_segments_mut()
        .map_err(|_| VenueError::Config(format!("`{rendered}` cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

fn request_failed(e: reqwest::Error) -> VenueError {
    VenueError::Store {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, VenueError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = match status {
        StatusCode::NOT_FOUND => format!("worksheet or spreadsheet not found: {body}"),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("access denied ({status}); is the sheet shared with the service account? {body}")
        }
        _ => format!("sheets API returned {status}: {body}"),
    };
    Err(VenueError::store(message))
}
