//! Remote service descriptors: what the hub reports about its accessories.
//!
//! A [`RemoteService`] is a snapshot: it carries the characteristic values as
//! they were when the hub was queried (or when a monitor batch was produced).

use serde::{Deserialize, Serialize};

use crate::characteristic::CharacteristicValue;
use crate::error::{GarageError, NotFoundError, ValidationError};

/// One characteristic of a remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCharacteristic {
    /// Instance id, unique within the owning accessory.
    pub iid: u64,
    /// Characteristic type name (e.g. `On`, `ContactSensorState`).
    pub kind: String,
    /// Human-readable description reported by the hub.
    pub description: String,
    /// Last known value.
    pub value: CharacteristicValue,
}

/// A service exposed by an accessory on the remote hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteService {
    /// Accessory id on the hub.
    pub aid: u64,
    /// Service instance id, unique within the accessory.
    pub iid: u64,
    /// Service type name (e.g. `Switch`, `ContactSensor`).
    pub kind: String,
    /// Display name of the service, used for lookups by name.
    pub service_name: String,
    /// Characteristics exposed by the service.
    pub characteristics: Vec<RemoteCharacteristic>,
}

impl RemoteService {
    /// Find a characteristic by type name.
    #[must_use]
    pub fn characteristic(&self, name: &str) -> Option<&RemoteCharacteristic> {
        self.characteristics.iter().find(|c| c.kind == name)
    }

    /// Read a characteristic as a binary flag.
    ///
    /// # Errors
    ///
    /// Returns [`GarageError::NotFound`] when the service has no such
    /// characteristic and [`GarageError::Validation`] when its value has no
    /// flag interpretation.
    pub fn flag(&self, name: &str) -> Result<bool, GarageError> {
        let characteristic = self.characteristic(name).ok_or_else(|| NotFoundError {
            entity: "Characteristic",
            id: format!("{}/{name}", self.service_name),
        })?;

        characteristic.value.as_flag().ok_or_else(|| {
            ValidationError::UnsupportedValue {
                characteristic: name.to_string(),
                value: characteristic.value.to_string(),
            }
            .into()
        })
    }

    /// Whether this service is the one configured under `name`.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.service_name == name
    }

    /// Whether `other` is the same hub service, by accessory and instance id.
    #[must_use]
    pub fn is_same(&self, other: &RemoteService) -> bool {
        self.aid == other.aid && self.iid == other.iid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(value: CharacteristicValue) -> RemoteService {
        RemoteService {
            aid: 3,
            iid: 8,
            kind: "ContactSensor".to_string(),
            service_name: "Garage Sensor".to_string(),
            characteristics: vec![RemoteCharacteristic {
                iid: 10,
                kind: "ContactSensorState".to_string(),
                description: "Contact Sensor State".to_string(),
                value,
            }],
        }
    }

    #[test]
    fn should_find_characteristic_by_type_name() {
        let service = sensor(CharacteristicValue::Int(0));
        assert_eq!(service.characteristic("ContactSensorState").unwrap().iid, 10);
        assert!(service.characteristic("On").is_none());
    }

    #[test]
    fn should_read_flag_from_numeric_value() {
        let service = sensor(CharacteristicValue::Int(1));
        assert!(service.flag("ContactSensorState").unwrap());
    }

    #[test]
    fn should_return_not_found_when_characteristic_missing() {
        let service = sensor(CharacteristicValue::Int(1));
        assert!(matches!(service.flag("On"), Err(GarageError::NotFound(_))));
    }

    #[test]
    fn should_return_validation_error_for_string_value() {
        let service = sensor(CharacteristicValue::String("open".into()));
        assert!(matches!(
            service.flag("ContactSensorState"),
            Err(GarageError::Validation(ValidationError::UnsupportedValue { .. }))
        ));
    }

    #[test]
    fn should_match_service_by_exact_name() {
        let service = sensor(CharacteristicValue::Int(0));
        assert!(service.is_named("Garage Sensor"));
        assert!(!service.is_named("garage sensor"));
    }

    #[test]
    fn should_match_same_service_by_ids_not_name() {
        let service = sensor(CharacteristicValue::Int(0));
        let mut renamed = sensor(CharacteristicValue::Int(1));
        renamed.service_name = "Garage".to_string();
        assert!(service.is_same(&renamed));

        let mut sibling = sensor(CharacteristicValue::Int(0));
        sibling.iid = 12;
        assert!(!service.is_same(&sibling));
    }
}
