//! Virtual momentary switch: every `On = true` write is one pulse.

use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::remote::{RemoteCharacteristic, RemoteService};

/// A simulated momentary switch.
///
/// The `On` characteristic always reads `false`: the relay closes for an
/// instant and releases on its own.
pub struct VirtualSwitch {
    aid: u64,
    name: String,
    pulses: u32,
}

impl VirtualSwitch {
    #[must_use]
    pub fn new(aid: u64, name: &str) -> Self {
        Self {
            aid,
            name: name.to_string(),
            pulses: 0,
        }
    }

    #[must_use]
    pub fn aid(&self) -> u64 {
        self.aid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of pulses received since creation.
    #[must_use]
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Apply a write to `On`. Returns `true` when the write triggered a pulse.
    pub fn write(&mut self, value: &CharacteristicValue) -> bool {
        if value.as_flag() == Some(true) {
            self.pulses += 1;
            true
        } else {
            false
        }
    }

    /// Produce the HAP-shaped service descriptor.
    #[must_use]
    pub fn service(&self) -> RemoteService {
        RemoteService {
            aid: self.aid,
            iid: 8,
            kind: "Switch".to_string(),
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
                    kind: "On".to_string(),
                    description: "On".to_string(),
                    value: CharacteristicValue::Bool(false),
                },
            ],
        }
    }
}
