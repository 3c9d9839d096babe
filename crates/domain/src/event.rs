//! Event: an immutable record of something that happened to an accessory.
//!
//! Events are produced when activation finishes or fails and when any of the
//! exposed characteristics changes.

use serde::{Deserialize, Serialize};

use crate::id::{AccessoryId, EventId};
use crate::time::{Timestamp, now};

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Activated,
    ActivationFailed,
    CurrentDoorStateChanged,
    TargetDoorStateChanged,
    ObstructionChanged,
}

/// A single event published on the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub accessory_id: AccessoryId,
    pub accessory: String,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(
        event_type: EventType,
        accessory_id: AccessoryId,
        accessory: &str,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            accessory_id,
            accessory: accessory.to_string(),
            data,
            timestamp: now(),
        }
    }
}
