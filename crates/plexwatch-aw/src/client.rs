//! HeartbeatSink trait and AwClient (ActivityWatch REST wrapper).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use url::Url;

use crate::error::AwError;
use crate::event::Event;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5600";
pub const TESTING_SERVER_URL: &str = "http://localhost:5666";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Pulse duration for a given poll interval: one second of slack on top of
/// the interval, so heartbeats at the configured cadence merge into one
/// continuous event.
pub fn pulse_duration(poll_interval: Duration) -> Duration {
    poll_interval + Duration::from_secs(1)
}

/// Destination for heartbeat events. Enables fake injection for testing.
#[async_trait]
pub trait HeartbeatSink: Send + Sync {
    /// Create the bucket if it does not exist yet.
    async fn ensure_bucket(&self, bucket_id: &str, event_type: &str) -> Result<(), AwError>;

    /// Check that the server is reachable.
    async fn connect(&self) -> Result<(), AwError>;

    /// Send a heartbeat. The server merges it into the previous event when
    /// the data is identical and the gap is within `pulse_duration`.
    async fn heartbeat(
        &self,
        bucket_id: &str,
        event: &Event,
        pulse_duration: Duration,
    ) -> Result<(), AwError>;
}

#[derive(Debug, Clone)]
pub struct AwClient {
    http: Client,
    server_url: Url,
    client_name: String,
    hostname: String,
}

impl AwClient {
    pub fn new(server_url: &str, client_name: impl Into<String>) -> Result<Self, AwError> {
        let server_url = Url::parse(server_url.trim())?;
        if server_url.cannot_be_a_base() {
            return Err(AwError::NotABase(server_url.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            server_url,
            client_name: client_name.into(),
            hostname: sysinfo::System::host_name()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Bucket id: `{client_name}_{hostname}`.
    pub fn bucket_id(&self) -> String {
        format!("{}_{}", self.client_name, self.hostname)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.server_url.clone();
        // Checked in `new`: the server url can be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn check(response: reqwest::Response, url: &Url) -> Result<(), AwError> {
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_MODIFIED {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%url, %status, body = body.trim(), "activitywatch rejected request");
        Err(AwError::Status {
            status,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl HeartbeatSink for AwClient {
    async fn ensure_bucket(&self, bucket_id: &str, event_type: &str) -> Result<(), AwError> {
        let url = self.endpoint(&["api", "0", "buckets", bucket_id]);
        let body = json!({
            "client": self.client_name,
            "type": event_type,
            "hostname": self.hostname,
        });

        let response = self
            .http
            .post(url.clone())
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::check(response, &url).await?;

        tracing::debug!(bucket_id, event_type, "bucket ready");
        Ok(())
    }

    async fn connect(&self) -> Result<(), AwError> {
        let url = self.endpoint(&["api", "0", "info"]);
        let response = self
            .http
            .get(url.clone())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::check(response, &url).await?;

        tracing::info!(server = %self.server_url, "connected to activitywatch");
        Ok(())
    }

    async fn heartbeat(
        &self,
        bucket_id: &str,
        event: &Event,
        pulse_duration: Duration,
    ) -> Result<(), AwError> {
        let mut url = self.endpoint(&["api", "0", "buckets", bucket_id, "heartbeat"]);
        url.query_pairs_mut()
            .append_pair("pulsetime", &pulse_duration.as_secs_f64().to_string());

        let response = self
            .http
            .post(url.clone())
            .json(event)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::check(response, &url).await
    }
}
