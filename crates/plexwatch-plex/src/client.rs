//! SessionSource trait and PlexClient (HTTP wrapper).

use std::time::Duration;

use async_trait::async_trait;
use plexwatch_core::Session;
use reqwest::Client;
use url::Url;

use crate::container::{parse_identity, parse_sessions};
use crate::error::PlexError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:32400";

/// Per-request timeout. A slow server delays the tick, never blocks forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PRODUCT: &str = "aw-watcher-plex";

/// Source of active playback sessions. Enables fake injection for testing.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn list_active_sessions(&self) -> Result<Vec<Session>, PlexError>;

    /// Human-readable server name.
    async fn server_identity(&self) -> Result<String, PlexError>;
}

/// Real media server client over HTTP.
#[derive(Debug, Clone)]
pub struct PlexClient {
    http: Client,
    base_url: Url,
    token: String,
    timeout: Duration,
}

impl PlexClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, PlexError> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base(base_url)?,
            token: token.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, PlexError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get(&self, path: &str) -> Result<String, PlexError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "plex request");

        let response = self
            .http
            .get(url.clone())
            .header("X-Plex-Token", &self.token)
            .header("X-Plex-Product", PRODUCT)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlexError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SessionSource for PlexClient {
    async fn list_active_sessions(&self) -> Result<Vec<Session>, PlexError> {
        let body = self.get("status/sessions").await?;
        let sessions = parse_sessions(&body)?;
        tracing::debug!("fetched {} active sessions", sessions.len());
        Ok(sessions)
    }

    async fn server_identity(&self) -> Result<String, PlexError> {
        let body = self.get("").await?;
        Ok(parse_identity(&body)?.unwrap_or_else(|| self.base_url.to_string()))
    }
}

/// Parse the base URL and make sure its path ends in `/` so that relative
/// joins append instead of replacing the last segment.
fn normalize_base(base_url: &str) -> Result<Url, PlexError> {
    let mut url = Url::parse(base_url.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
