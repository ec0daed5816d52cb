//! `MediaContainer` response envelope and parsers.

use plexwatch_core::Session;
use serde::Deserialize;

use crate::error::PlexError;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "MediaContainer", default)]
    media_container: MediaContainer,
}

/// Top-level container returned by every JSON endpoint.
///
/// `Metadata` entries are kept as raw JSON so that one malformed session
/// does not discard the others.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContainer {
    pub size: Option<u64>,
    pub friendly_name: Option<String>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<serde_json::Value>,
}

impl MediaContainer {
    pub fn from_json(body: &str) -> Result<Self, PlexError> {
        let envelope: Envelope = serde_json::from_str(body)?;
        Ok(envelope.media_container)
    }
}

/// Parse the body of `GET /status/sessions`.
///
/// A container without `Metadata` means no active sessions. Wrongly typed
/// fields default inside the session; entries that are not JSON objects are
/// logged and skipped.
pub fn parse_sessions(body: &str) -> Result<Vec<Session>, PlexError> {
    let container = MediaContainer::from_json(body)?;
    let mut sessions = Vec::with_capacity(container.metadata.len());

    for (idx, raw) in container.metadata.into_iter().enumerate() {
        match serde_json::from_value::<Session>(raw) {
            Ok(session) => sessions.push(session),
            Err(e) => tracing::warn!(index = idx, "skipping undecodable session: {e}"),
        }
    }

    Ok(sessions)
}

/// Parse the body of `GET /` and return the server's friendly name.
pub fn parse_identity(body: &str) -> Result<Option<String>, PlexError> {
    let container = MediaContainer::from_json(body)?;
    Ok(container.friendly_name.filter(|n| !n.trim().is_empty()))
}
