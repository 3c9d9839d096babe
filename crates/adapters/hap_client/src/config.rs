//! HAP client configuration.

use serde::Deserialize;

/// Connection settings of the remote Homebridge instance.
///
/// The pin is not part of this record: every accessory carries its own
/// `hapClientPin`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HapConfig {
    /// Base URL of the HAP server (Homebridge must run in insecure mode).
    pub url: String,
    /// Interval between two polls of the monitor, in milliseconds.
    pub poll_interval_ms: u64,
    /// Timeout of a single HTTP request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for HapConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:51826".to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: 5000,
        }
    }
}
