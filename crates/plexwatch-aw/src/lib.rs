//! plexwatch-aw: activity tracker IO boundary.
//! Bucket creation, connectivity check and heartbeats against the
//! ActivityWatch REST API.

pub mod client;
pub mod error;
pub mod event;

pub use client::{
    AwClient, DEFAULT_SERVER_URL, HeartbeatSink, TESTING_SERVER_URL, pulse_duration,
};
pub use error::AwError;
pub use event::Event;
