//! plexwatch-plex: media server IO boundary.
//! Fetches active sessions and server identity over HTTP and decodes them
//! into `plexwatch_core::Session` records. No selection or extraction logic.

pub mod client;
pub mod container;
pub mod error;

pub use client::{DEFAULT_BASE_URL, PlexClient, SessionSource};
pub use container::{MediaContainer, parse_identity, parse_sessions};
pub use error::PlexError;
pub use reqwest::StatusCode;
