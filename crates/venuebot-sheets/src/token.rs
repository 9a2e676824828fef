// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth2 access tokens for the Sheets and Drive APIs.
//!
//! [`ServiceAccountTokens`] signs an RS256 JWT assertion with the service
//! account key and exchanges it at the token endpoint. The bearer token is
//! cached until shortly before it expires.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use venuebot_core::VenueError;

use crate::credentials::ServiceAccountKey;

/// Scopes requested for the service account.
pub const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive.readonly";

const GRANT_TYPE: &str = "urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer";

/// Lifetime requested for each assertion, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for Google API calls.
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn access_token(&self) -> Result<SecretString, VenueError>;
}

/// A fixed token, for tests and for tokens minted outside the process.
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<SecretString, VenueError> {
        Ok(self.0.clone())
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Mints tokens from a service account key.
pub struct ServiceAccountTokens {
    http: reqwest::Client,
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    key_pair: RsaKeyPair,
    rng: SystemRandom,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    pub fn new(http: reqwest::Client, key: &ServiceAccountKey) -> Result<Self, VenueError> {
        let der = key.private_key_der()?;
        let key_pair = RsaKeyPair::from_pkcs8(&der)
            .map_err(|e| VenueError::Credentials(format!("private key rejected: {e}")))?;
        Ok(Self {
            http,
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            key_pair,
            rng: SystemRandom::new(),
            cached: Mutex::new(None),
        })
    }

    /// Builds a signed `header.claims.signature` assertion issued at `iat`.
    pub fn signed_assertion(&self, iat: i64) -> Result<String, VenueError> {
        let mut header = serde_json::json!({"alg": "RS256", "typ": "JWT"});
        if let Some(kid) = &self.key_id {
            header["kid"] = serde_json::Value::String(kid.clone());
        }
        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let signing_input = format!(
            "{}.{}",
            encode_segment(&header)?,
            encode_segment(&claims)?
        );

        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(
                &RSA_PKCS1_SHA256,
                &self.rng,
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| VenueError::Credentials("failed to sign token assertion".into()))?;

        Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    async fn fetch(&self) -> Result<CachedToken, VenueError> {
        let assertion = self.signed_assertion(chrono::Utc::now().timestamp())?;
        // The assertion is base64url segments joined by dots, already form-safe.
        let body = format!("grant_type={GRANT_TYPE}&assertion={assertion}");

        let response = self
            .http
            .post(&self.token_uri)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .map_err(|e| VenueError::Store {
                message: format!("token request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VenueError::Credentials(format!(
                "token endpoint returned {status}: {text}"
            )));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| VenueError::Store {
            message: format!("malformed token response: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(expires_in = parsed.expires_in, "minted access token");

        let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            token: SecretString::from(parsed.access_token),
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> Result<SecretString, VenueError> {
        let mut cached = self.cached.lock().await;
        if let Some(c) = cached.as_ref()
            && Instant::now() < c.refresh_at
        {
            return Ok(c.token.clone());
        }
        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// Bearer header value for a token.
pub(crate) fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, VenueError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| VenueError::Internal(format!("JWT segment encoding failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
