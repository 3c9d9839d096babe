//! Virtual contact sensor: `ContactSensorState` is 1 while the door is open.

use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::remote::{RemoteCharacteristic, RemoteService};

/// A simulated reed contact on the door frame.
pub struct VirtualContactSensor {
    aid: u64,
    name: String,
    open: bool,
}

impl VirtualContactSensor {
    #[must_use]
    pub fn new(aid: u64, name: &str, open: bool) -> Self {
        Self {
            aid,
            name: name.to_string(),
            open,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Produce the HAP-shaped service descriptor with the current reading.
    #[must_use]
    pub fn service(&self) -> RemoteService {
        RemoteService {
            aid: self.aid,
            iid: 8,
            kind: "ContactSensor".to_string(),
            service_name: self.name.clone(),
            characteristics: vec![
                RemoteCharacteristic {
                    iid: 9,
                    kind: "Name".to_string(),
                    description: "Name".to_string(),
                    value: CharacteristicValue::String(self.name.clone()),
                },
                RemoteCharacteristic {
                    iid: 10,
                    kind: "ContactSensorState".to_string(),
                    description: "Contact Sensor State".to_string(),
                    value: CharacteristicValue::Int(i64::from(self.open)),
                },
            ],
        }
    }
}
