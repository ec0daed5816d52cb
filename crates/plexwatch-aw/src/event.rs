//! Heartbeat event payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AwError;

/// One ActivityWatch event. Heartbeats are sent with zero duration; the
/// server grows the stored event as adjacent heartbeats merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub duration: f64,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(timestamp: DateTime<Utc>, data: &impl Serialize) -> Result<Self, AwError> {
        Ok(Self {
            timestamp,
            duration: 0.0,
            data: serde_json::to_value(data)?,
        })
    }
}
