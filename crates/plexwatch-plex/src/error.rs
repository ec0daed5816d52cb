//! Error types for the media server boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlexError {
    #[error("plex request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("plex returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to decode plex response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid plex base url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
