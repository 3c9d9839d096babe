//! HAP JSON parsing.
//!
//! `GET /accessories` returns accessories keyed by `aid`, each with services
//! and characteristics identified by Apple UUIDs. Known UUIDs are mapped to
//! their type names so the rest of the workspace can look characteristics up
//! by name (`On`, `ContactSensorState`, ...).

use serde::Deserialize;

use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::remote::{RemoteCharacteristic, RemoteService};

const ACCESSORY_INFORMATION: &str = "3E";
const PROTOCOL_INFORMATION: &str = "A2";
const NAME: &str = "23";

/// Apple-defined service types.
const SERVICE_TYPES: &[(&str, &str)] = &[
    ("3E", "AccessoryInformation"),
    ("40", "Fan"),
    ("41", "GarageDoorOpener"),
    ("43", "Lightbulb"),
    ("45", "LockMechanism"),
    ("47", "Outlet"),
    ("49", "Switch"),
    ("4A", "Thermostat"),
    ("80", "ContactSensor"),
    ("82", "HumiditySensor"),
    ("85", "MotionSensor"),
    ("8A", "TemperatureSensor"),
    ("96", "BatteryService"),
    ("A2", "ProtocolInformation"),
];

/// Apple-defined characteristic types.
const CHARACTERISTIC_TYPES: &[(&str, &str)] = &[
    ("8", "Brightness"),
    ("E", "CurrentDoorState"),
    ("11", "CurrentTemperature"),
    ("14", "Identify"),
    ("20", "Manufacturer"),
    ("21", "Model"),
    ("22", "MotionDetected"),
    ("23", "Name"),
    ("24", "ObstructionDetected"),
    ("25", "On"),
    ("26", "OutletInUse"),
    ("30", "SerialNumber"),
    ("32", "TargetDoorState"),
    ("52", "FirmwareRevision"),
    ("68", "BatteryLevel"),
    ("6A", "ContactSensorState"),
    ("79", "StatusLowBattery"),
];

#[derive(Debug, Deserialize)]
struct AccessoriesBody {
    accessories: Vec<HapAccessory>,
}

#[derive(Debug, Deserialize)]
struct HapAccessory {
    aid: u64,
    #[serde(default)]
    services: Vec<HapService>,
}

#[derive(Debug, Deserialize)]
struct HapService {
    iid: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    characteristics: Vec<HapCharacteristic>,
}

#[derive(Debug, Deserialize)]
struct HapCharacteristic {
    iid: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    value: Option<CharacteristicValue>,
}

/// Reduce a HAP type to its short uppercase form.
///
/// Both `"25"` and `"00000025-0000-1000-8000-0026BB765291"` yield `"25"`.
fn short_type(kind: &str) -> String {
    let head = kind.split('-').next().unwrap_or(kind);
    let trimmed = head.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

fn lookup(table: &[(&'static str, &'static str)], short: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(uuid, _)| *uuid == short)
        .map(|(_, name)| *name)
}

fn characteristic_kind(raw: &HapCharacteristic) -> String {
    if let Some(name) = lookup(CHARACTERISTIC_TYPES, &short_type(&raw.kind)) {
        return name.to_string();
    }
    match &raw.description {
        Some(description) if !description.trim().is_empty() => description.replace(' ', ""),
        _ => raw.kind.clone(),
    }
}

fn service_kind(raw: &HapService) -> String {
    lookup(SERVICE_TYPES, &short_type(&raw.kind))
        .map_or_else(|| raw.kind.clone(), str::to_string)
}

fn name_of(service: &HapService) -> Option<String> {
    service
        .characteristics
        .iter()
        .find(|c| short_type(&c.kind) == NAME)
        .and_then(|c| match &c.value {
            Some(CharacteristicValue::String(name)) => Some(name.clone()),
            _ => None,
        })
}

fn convert_characteristic(raw: HapCharacteristic) -> RemoteCharacteristic {
    let kind = characteristic_kind(&raw);
    RemoteCharacteristic {
        iid: raw.iid,
        description: raw.description.unwrap_or_else(|| kind.clone()),
        kind,
        value: raw
            .value
            .unwrap_or(CharacteristicValue::Json(serde_json::Value::Null)),
    }
}

/// Parse a `GET /accessories` body into the list of user-facing services.
///
/// Information and protocol services are skipped. A service is named after
/// its own `Name` characteristic, falling back to the accessory name.
///
/// # Errors
///
/// Returns the JSON error when the body is not a HAP accessory database.
pub fn parse_accessories(body: &[u8]) -> Result<Vec<RemoteService>, serde_json::Error> {
    let body: AccessoriesBody = serde_json::from_slice(body)?;
    let mut services = Vec::new();

    for accessory in body.accessories {
        let accessory_name = accessory
            .services
            .iter()
            .find(|s| short_type(&s.kind) == ACCESSORY_INFORMATION)
            .and_then(name_of);

        for service in accessory.services {
            let short = short_type(&service.kind);
            if short == ACCESSORY_INFORMATION || short == PROTOCOL_INFORMATION {
                continue;
            }
            let kind = service_kind(&service);
            let service_name = name_of(&service)
                .or_else(|| accessory_name.clone())
                .unwrap_or_else(|| kind.clone());
            services.push(RemoteService {
                aid: accessory.aid,
                iid: service.iid,
                kind,
                service_name,
                characteristics: service
                    .characteristics
                    .into_iter()
                    .map(convert_characteristic)
                    .collect(),
            });
        }
    }

    Ok(services)
}
