//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `garage-bridge.toml` in the working directory, or at the path in
//! `GARAGE_BRIDGE_CONFIG`. Every section has a sensible default so the file
//! is optional, although without `[[accessories]]` nothing gets bridged.
//! Environment variables take precedence over file values.

use serde::Deserialize;

use garage_bridge_adapter_hap::HapConfig;
use garage_bridge_adapter_virtual::VirtualConfig;
use garage_bridge_domain::settings::AccessoryConfig;

const DEFAULT_PATH: &str = "garage-bridge.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Remote hub the accessories are bridged from.
    pub hub: HubConfig,
    /// One entry per garage door. Entries are validated when the
    /// accessories start, so an invalid one never prevents the others.
    pub accessories: Vec<AccessoryConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Which remote hub implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubKind {
    /// Homebridge over HAP JSON/HTTP.
    #[default]
    Hap,
    /// Simulated doors, for demos.
    Virtual,
}

/// Remote hub configuration. Options of both kinds live in the same table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub kind: HubKind,
    #[serde(flatten)]
    pub hap: HapConfig,
    #[serde(flatten)]
    pub simulation: VirtualConfig,
}

impl Config {
    /// Load configuration from `GARAGE_BRIDGE_CONFIG` or `garage-bridge.toml`
    /// (if present) then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("GARAGE_BRIDGE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("GARAGE_BRIDGE_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("GARAGE_BRIDGE_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("GARAGE_BRIDGE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("GARAGE_BRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.hub.kind == HubKind::Hap && self.hub.hap.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "hub.poll_interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8581,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "garage_bridged=info,garage_bridge=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
