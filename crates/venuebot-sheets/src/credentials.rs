// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service account credential loading.
//!
//! The key is looked up in two places, in order: the secret injected into
//! the environment (`VENUEBOT_GCP_SERVICE_ACCOUNT`, holding the JSON key
//! itself), then the key file on disk. Finding neither is fatal at startup.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use venuebot_core::VenueError;

/// Environment variable holding the service account JSON key.
pub const CREDENTIALS_ENV: &str = "VENUEBOT_GCP_SERVICE_ACCOUNT";

/// Google's OAuth token endpoint, used when the key omits `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a Google service account key that token minting needs.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    pub private_key_id: Option<String>,
    pub project_id: Option<String>,
    pub token_uri: String,
}

/// Wire shape of the JSON key file; unused fields are ignored.
#[derive(Deserialize)]
struct KeyFile {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parses a JSON key.
    pub fn from_json(json: &str) -> Result<Self, VenueError> {
        let raw: KeyFile = serde_json::from_str(json)
            .map_err(|e| VenueError::Credentials(format!("malformed service account key: {e}")))?;
        Ok(Self {
            client_email: raw.client_email,
            private_key: SecretString::from(raw.private_key),
            private_key_id: raw.private_key_id,
            project_id: raw.project_id,
            token_uri: raw.token_uri,
        })
    }

    /// DER bytes of the PKCS#8 private key inside the PEM block.
    pub fn private_key_der(&self) -> Result<Vec<u8>, VenueError> {
        pem_to_der(self.private_key.expose_secret())
    }
}

/// Loads the key from the environment secret, falling back to `file`.
///
/// `env_value` is the content of [`CREDENTIALS_ENV`], passed in by the caller.
/// A present-but-malformed secret is an error rather than a silent fallback.
pub fn load_service_account(
    env_value: Option<&str>,
    file: &Path,
) -> Result<ServiceAccountKey, VenueError> {
    if let Some(json) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        let key = ServiceAccountKey::from_json(json)?;
        info!(client_email = %key.client_email, "using service account from environment");
        return Ok(key);
    }
    debug!(env = CREDENTIALS_ENV, "no service account in environment");

    match std::fs::read_to_string(file) {
        Ok(json) => {
            let key = ServiceAccountKey::from_json(&json)?;
            info!(
                client_email = %key.client_email,
                path = %file.display(),
                "using service account key file"
            );
            Ok(key)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VenueError::Credentials(
            format!(
                "no service account credential found: set {CREDENTIALS_ENV} or provide {}",
                file.display()
            ),
        )),
        Err(e) => Err(VenueError::Credentials(format!(
            "cannot read {}: {e}",
            file.display()
        ))),
    }
}

fn pem_to_der(pem: &str) -> Result<Vec<u8>, VenueError> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("-----"))
        .collect();
    if body.is_empty() {
        return Err(VenueError::Credentials("private key is empty".into()));
    }
    STANDARD
        .decode(body)
        .map_err(|e| VenueError::Credentials(format!("private key is not valid base64: {e}")))
}
