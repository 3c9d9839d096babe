//! Accessory settings: the raw configuration record and its validated form.
//!
//! [`AccessoryConfig`] mirrors what an operator writes (every field optional,
//! camelCase option names). [`GarageDoorSettings::from_config`] is the only
//! way to obtain settings, so a settings value always has its mandatory names
//! and its defaults applied.

use std::time::Duration;

use serde::Deserialize;

use crate::door::TimerPolicy;
use crate::error::ValidationError;

/// Default characteristic pulsed on the switch service.
pub const DEFAULT_SWITCH_CHARACTERISTIC: &str = "On";
/// Default characteristic read on the sensor service.
pub const DEFAULT_SENSOR_CHARACTERISTIC: &str = "ContactSensorState";
/// Default delay before resolving the remote services.
pub const DEFAULT_INIT_DELAY: Duration = Duration::from_millis(20_000);

/// One accessory entry as written in the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryConfig {
    pub name: Option<String>,
    pub switch_service_name: Option<String>,
    pub switch_characteristic_name: Option<String>,
    pub sensor_service_name: Option<String>,
    pub sensor_characteristic_name: Option<String>,
    /// Expected open/close duration in milliseconds.
    pub open_time: Option<u64>,
    pub hap_client_pin: Option<String>,
    /// Delay before activation in milliseconds.
    pub init_delay: Option<u64>,
    #[serde(default)]
    pub ignore_superseded_timers: bool,
}

/// Validated, immutable settings of one garage door accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarageDoorSettings {
    pub name: String,
    pub switch_service_name: String,
    pub switch_characteristic_name: String,
    pub sensor_service_name: String,
    pub sensor_characteristic_name: String,
    /// Obstruction window; `None` disables the obstruction heuristic.
    pub open_time: Option<Duration>,
    pub hap_client_pin: String,
    pub init_delay: Duration,
    pub timer_policy: TimerPolicy,
}

impl GarageDoorSettings {
    /// Validate a raw record and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first mandatory
    /// option that is absent or blank.
    pub fn from_config(config: AccessoryConfig) -> Result<Self, ValidationError> {
        let name = required(config.name, "name")?;
        let switch_service_name = required(config.switch_service_name, "switchServiceName")?;
        let sensor_service_name = required(config.sensor_service_name, "sensorServiceName")?;
        let hap_client_pin = required(config.hap_client_pin, "hapClientPin")?;

        Ok(Self {
            name,
            switch_service_name,
            switch_characteristic_name: optional(config.switch_characteristic_name)
                .unwrap_or_else(|| DEFAULT_SWITCH_CHARACTERISTIC.to_string()),
            sensor_service_name,
            sensor_characteristic_name: optional(config.sensor_characteristic_name)
                .unwrap_or_else(|| DEFAULT_SENSOR_CHARACTERISTIC.to_string()),
            open_time: config
                .open_time
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            hap_client_pin,
            init_delay: config
                .init_delay
                .map_or(DEFAULT_INIT_DELAY, Duration::from_millis),
            timer_policy: if config.ignore_superseded_timers {
                TimerPolicy::IgnoreSuperseded
            } else {
                TimerPolicy::EvaluateAll
            },
        })
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    optional(value).ok_or(ValidationError::MissingField(field))
}
