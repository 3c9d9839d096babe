//! Virtual hub configuration.

use serde::Deserialize;

/// Behaviour of the simulated doors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Time between a pulse and the contact flipping, in milliseconds.
    pub travel_time_ms: u64,
    /// Sensor service names whose door never moves.
    pub jammed: Vec<String>,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            travel_time_ms: 10_000,
            jammed: Vec::new(),
        }
    }
}
