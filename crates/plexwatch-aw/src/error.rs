//! Error types for the activity tracker boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AwError {
    #[error("activitywatch request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("activitywatch returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid activitywatch server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("activitywatch server url cannot be a base: {0}")]
    NotABase(String),

    #[error("failed to encode event data: {0}")]
    Encode(#[from] serde_json::Error),
}
